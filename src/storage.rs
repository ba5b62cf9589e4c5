use crate::errors::AppError;
use crate::models::PageSnapshot;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_page(path: &Path) -> PageSnapshot {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(page) => page,
            Err(err) => {
                error!("failed to parse page file: {err}");
                PageSnapshot::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => PageSnapshot::default(),
        Err(err) => {
            error!("failed to read page file: {err}");
            PageSnapshot::default()
        }
    }
}

pub async fn persist_page(path: &Path, page: &PageSnapshot) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(page)?;
    fs::write(path, payload).await?;
    Ok(())
}
