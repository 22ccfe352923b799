//! File upload API
//!
//! Accepts multipart form data on the "files" field, persists each file
//! under the configured upload directory with a generated unique name, and
//! records an attachment per file. Attachment records can later be
//! referenced by id when sending a message.

use crate::api::utils::RouterState;
use crate::error::AppError;
use crate::storage::{Attachment, NewAttachment};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

/// Persist one uploaded file under `dir` with a generated unique filename
///
/// Returns the insert fields for the attachment record; the record keeps
/// the client's original filename while the stored file gets a unique name.
async fn persist_upload(
    dir: &str,
    original_filename: &str,
    mimetype: &str,
    data: &[u8],
) -> Result<NewAttachment, AppError> {
    let ext = Path::new(original_filename)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("bin");
    let stored_name = format!("{}-{}.{}", Uuid::new_v4(), Utc::now().timestamp(), ext);
    let file_path = PathBuf::from(dir).join(&stored_name);

    let mut file = fs::File::create(&file_path)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload file: {}", e)))?;
    file.write_all(data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write upload file: {}", e)))?;
    file.sync_all()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sync upload file: {}", e)))?;

    Ok(NewAttachment {
        filename: original_filename.to_string(),
        mimetype: mimetype.to_string(),
        size: data.len().to_string(),
        path: file_path.to_string_lossy().to_string(),
    })
}

/// Remove files saved earlier in a request that later failed
async fn cleanup_files(paths: &[String]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path).await {
            warn!("Failed to cleanup upload {}: {}", path, e);
        }
    }
}

/// POST /api/upload - Upload files and create attachment records
///
/// Accepts at most 5 files of up to 10 MiB each on the "files" field.
pub async fn upload_files(
    State((storage, _, config)): State<RouterState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Attachment>>, AppError> {
    let mut pending: Vec<NewAttachment> = Vec::new();
    let mut saved_paths: Vec<String> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                cleanup_files(&saved_paths).await;
                return Err(AppError::Validation(format!(
                    "Failed to read multipart field: {}",
                    e
                )));
            }
        };

        let field_name = field.name().unwrap_or("");
        if field_name != "files" {
            warn!("Unknown multipart field: {}", field_name);
            continue;
        }

        let Some(original_filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if pending.len() >= config.uploads.max_files {
            cleanup_files(&saved_paths).await;
            return Err(AppError::Validation(format!(
                "At most {} files per upload",
                config.uploads.max_files
            )));
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                cleanup_files(&saved_paths).await;
                return Err(AppError::Validation(format!(
                    "Failed to read file data: {}",
                    e
                )));
            }
        };

        if data.len() > config.uploads.max_file_bytes {
            cleanup_files(&saved_paths).await;
            return Err(AppError::Validation(format!(
                "File {} exceeds the {} byte limit",
                original_filename, config.uploads.max_file_bytes
            )));
        }

        match persist_upload(&config.uploads.dir, &original_filename, &mimetype, &data).await {
            Ok(fields) => {
                info!(
                    "Saved uploaded file: {} ({} bytes)",
                    fields.path,
                    data.len()
                );
                saved_paths.push(fields.path.clone());
                pending.push(fields);
            }
            Err(e) => {
                cleanup_files(&saved_paths).await;
                return Err(e);
            }
        }
    }

    if pending.is_empty() {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }

    let mut attachments = Vec::with_capacity(pending.len());
    for fields in pending {
        attachments.push(storage.create_attachment(fields).await?);
    }

    Ok(Json(attachments))
}
