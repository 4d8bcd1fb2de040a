use anyhow::{Context, Result};

use crate::cli::{AppContext, Commands};

pub async fn handle(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            purpose,
            after,
            limit,
            order,
            all,
        } => {
            let mut request = ctx.client.files();
            if let Some(purpose) = purpose {
                request = request.purpose(purpose.to_purpose());
            }
            if let Some(after) = after {
                request = request.after(after);
            }
            if let Some(limit) = limit {
                request = request.limit(limit);
            }
            if let Some(order) = order {
                request = request.order(order.to_order());
            }

            if all {
                let files = request.list().await?.collect_all().await?;
                return ctx.output.emit_json(&files);
            }
            let page = request.list().await?;
            ctx.output.emit_json(&page)
        }
        Commands::Get { id } => {
            let file = ctx.client.file(id).get().await?;
            ctx.output.emit_json(&file)
        }
        Commands::Delete { id } => {
            let resp = ctx.client.file(id).delete().await?;
            ctx.output.emit_json(&resp)
        }
        Commands::Upload {
            path,
            purpose,
            filename,
        } => {
            let content = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let filename = match filename {
                Some(name) => name,
                None => path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .context("path has no filename")?,
            };
            let file = ctx
                .client
                .new_file(filename, content)
                .purpose(purpose.to_purpose())
                .create()
                .await?;
            ctx.output.emit_json(&file)
        }
        Commands::Import {
            object_path,
            purpose,
        } => {
            let file = ctx
                .client
                .new_file_from_object_path(object_path, purpose.to_purpose())
                .create()
                .await?;
            ctx.output.emit_json(&file)
        }
        Commands::Content { id, output } => {
            let content = ctx.client.file(id).content().await?;
            ctx.output.emit_bytes(&content, output.as_deref())
        }
        Commands::Path {
            id,
            internal,
            legacy,
        } => {
            let mut request = if internal {
                ctx.client.internal_file_path(id)
            } else {
                ctx.client.worker_file_path(id)
            };
            if legacy {
                request = request.legacy();
            }
            let loc = request.get().await?;
            ctx.output.emit_json(&loc)
        }
    }
}
