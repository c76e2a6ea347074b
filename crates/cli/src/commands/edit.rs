//! edit command - Replace an object's content
//!
//! Shows the current text of an object and replaces it with new content.

use std::io::BufRead;

use s3cm_core::BucketHandle;

use super::{content_type_for, prompt_content, prompt_key};
use crate::exit_code::ExitCode;
use crate::input::Prompter;
use crate::session::SessionContext;

/// Execute the edit command
pub async fn execute<R: BufRead>(
    ctx: &SessionContext<'_>,
    bucket: &BucketHandle,
    input: &mut Prompter<R>,
) -> ExitCode {
    let key = match prompt_key(ctx, input, "Enter the key of the object to edit:") {
        Ok(Some(key)) => key,
        Ok(None) => return ExitCode::Success,
        Err(code) => return code,
    };

    let current = match ctx.store.get_object(bucket.as_str(), &key).await {
        Ok(data) => data,
        Err(e) if e.is_not_found() => {
            ctx.formatter
                .error(&format!("Object '{key}' not found in {bucket}"));
            return ExitCode::NotFound;
        }
        Err(e) => {
            ctx.formatter.error(&format!("Failed to read object: {e}"));
            return ExitCode::from(&e);
        }
    };

    let Ok(current) = String::from_utf8(current) else {
        ctx.formatter.error(&format!(
            "Object '{key}' is not text and cannot be edited here"
        ));
        return ExitCode::GeneralError;
    };

    ctx.formatter.heading(&format!("Current content of {key}:"));
    ctx.formatter.println(current.trim_end_matches('\n'));

    let content = match prompt_content(ctx, input) {
        Ok(content) => content,
        Err(code) => return code,
    };

    if content == current {
        ctx.formatter.println("No changes made.");
        return ExitCode::Success;
    }

    if content.is_empty() {
        ctx.formatter
            .warning(&format!("No content entered; {key} will be saved empty"));
    }

    match ctx
        .store
        .edit_object(
            bucket.as_str(),
            &key,
            content.into_bytes(),
            Some(content_type_for(&key)),
        )
        .await
    {
        Ok(info) => {
            ctx.formatter
                .success(&format!("Updated {bucket}/{key} ({})", info.size_human));
            ExitCode::Success
        }
        Err(e) if e.is_not_found() => {
            ctx.formatter
                .error(&format!("Object '{key}' was removed before it could be saved"));
            ExitCode::NotFound
        }
        Err(e) => {
            ctx.formatter.error(&format!("Failed to save object: {e}"));
            ExitCode::from(&e)
        }
    }
}
