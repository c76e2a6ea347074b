//! put command - Create an object
//!
//! Prompts for a new key and its content, then uploads it. Existing keys are
//! left alone; changing them is the edit command's job.

use std::io::BufRead;

use s3cm_core::BucketHandle;

use super::{content_type_for, prompt_content, prompt_key};
use crate::exit_code::ExitCode;
use crate::input::Prompter;
use crate::session::SessionContext;

/// Execute the put command
pub async fn execute<R: BufRead>(
    ctx: &SessionContext<'_>,
    bucket: &BucketHandle,
    input: &mut Prompter<R>,
) -> ExitCode {
    let key = match prompt_key(ctx, input, "Enter the key of the new object:") {
        Ok(Some(key)) => key,
        Ok(None) => return ExitCode::Success,
        Err(code) => return code,
    };

    match ctx.store.object_exists(bucket.as_str(), &key).await {
        Ok(false) => {}
        Ok(true) => {
            ctx.formatter.error(&format!(
                "Object '{key}' already exists in {bucket}; use edit to change it"
            ));
            return ExitCode::Conflict;
        }
        Err(e) => {
            ctx.formatter
                .error(&format!("Failed to check object existence: {e}"));
            return ExitCode::from(&e);
        }
    }

    let content = match prompt_content(ctx, input) {
        Ok(content) => content,
        Err(code) => return code,
    };

    if content.is_empty() {
        ctx.formatter
            .warning(&format!("No content entered; {key} will be saved empty"));
    }

    match ctx
        .store
        .put_object(
            bucket.as_str(),
            &key,
            content.into_bytes(),
            Some(content_type_for(&key)),
        )
        .await
    {
        Ok(info) => {
            ctx.formatter.success(&format!(
                "Created {bucket}/{key} ({})",
                info.size_human
            ));
            ExitCode::Success
        }
        Err(e) => {
            ctx.formatter.error(&format!("Failed to upload: {e}"));
            ExitCode::from(&e)
        }
    }
}
