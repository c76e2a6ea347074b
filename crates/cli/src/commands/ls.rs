//! ls command - List bucket contents
//!
//! Lists every object in the session bucket as a table.

use comfy_table::{Cell, CellAlignment, Table, presets};
use s3cm_core::{BucketHandle, ObjectInfo, Result, StorageClient};

use crate::exit_code::ExitCode;
use crate::output::Spinner;
use crate::session::SessionContext;

/// Execute the ls command
pub async fn execute(ctx: &SessionContext<'_>, bucket: &BucketHandle) -> ExitCode {
    let spinner = Spinner::start(&ctx.formatter, &format!("Listing {bucket}..."));
    let result = list_all(ctx.store, bucket.as_str()).await;
    spinner.finish();

    let items = match result {
        Ok(items) => items,
        Err(e) => {
            ctx.formatter.error(&format!("Failed to list objects: {e}"));
            return ExitCode::from(&e);
        }
    };

    if items.is_empty() {
        ctx.formatter.println(&format!("Bucket {bucket} is empty."));
        return ExitCode::Success;
    }

    ctx.formatter.println(&render_table(&items).to_string());

    let total_size: i64 = items.iter().map(|i| i.size_bytes).sum();
    ctx.formatter.println(&format!(
        "Total: {} objects, {}",
        items.len(),
        humansize::format_size(total_size.max(0) as u64, humansize::BINARY)
    ));

    ExitCode::Success
}

/// Collect every object in `bucket`, following continuation tokens
pub async fn list_all(store: &dyn StorageClient, bucket: &str) -> Result<Vec<ObjectInfo>> {
    let mut items = Vec::new();
    let mut continuation_token = None;

    loop {
        let page = store.list_objects(bucket, continuation_token).await?;
        let more = page.is_truncated();
        items.extend(page.items);
        if !more {
            break;
        }
        continuation_token = page.continuation_token;
    }

    Ok(items)
}

fn render_table(items: &[ObjectInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_header(vec!["Key", "Size", "Last modified"]);

    for item in items {
        let modified = item
            .last_modified
            .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&item.key),
            Cell::new(&item.size_human).set_alignment(CellAlignment::Right),
            Cell::new(modified),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let mut alice = ObjectInfo::new("alice.vcf", 1024);
        alice.last_modified = Some("2024-05-01T12:30:00Z".parse().unwrap());
        let bob = ObjectInfo::new("bob.vcf", 10);

        let rendered = render_table(&[alice, bob]).to_string();
        assert!(rendered.contains("alice.vcf"));
        assert!(rendered.contains("1 KiB"));
        assert!(rendered.contains("2024-05-01 12:30:00"));
        assert!(rendered.contains("bob.vcf"));
        assert!(rendered.contains("10 B"));
    }
}
