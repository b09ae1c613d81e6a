//! Root identity initialization.

use crate::registration::create_user;
use anyhow::{Context, Result};
use dayoff_core::config::RootConfig;
use dayoff_core::{AccessToken, Username};
use dayoff_metadata::MetadataStore;
use std::path::Path;

/// Outcome of [`ensure_root_user`].
#[derive(Debug)]
pub struct RootCredential {
    /// Whether the root user was created by this call.
    pub created: bool,
    /// The new root token. Only available when the user was just created,
    /// since the store keeps a digest.
    pub token: Option<AccessToken>,
}

/// Ensure the root user exists, creating it with a fresh token if needed.
///
/// Concurrent callers race through the same insert-if-absent primitive as
/// registration, so exactly one of them creates the user.
pub async fn ensure_root_user(
    metadata: &dyn MetadataStore,
    config: &RootConfig,
) -> Result<RootCredential> {
    let root = Username::root();
    let token = create_user(metadata, &root, AccessToken::generate)
        .await
        .context("failed to create root user")?;

    let Some(token) = token else {
        tracing::info!("Root user already exists");
        return Ok(RootCredential {
            created: false,
            token: None,
        });
    };

    if let Some(path) = &config.token_file
        && let Err(e) = write_token_file(path, &token).await
    {
        // Last chance to hand out the secret; the store only has its digest.
        tracing::error!(
            path = %path.display(),
            error = %e,
            token = %token.as_str(),
            "Failed to write root token file"
        );
        return Err(e).with_context(|| format!("failed to write {}", path.display()));
    }

    if config.log_token {
        // Shown once: only the digest is persisted.
        tracing::warn!(token = %token.as_str(), "Root user created");
    } else {
        tracing::warn!("Root user created; token logging is disabled");
    }

    Ok(RootCredential {
        created: true,
        token: Some(token),
    })
}

/// Write `token` to `path`, readable by the owner only.
async fn write_token_file(path: &Path, token: &AccessToken) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(token.as_str().as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;
    tracing::info!(path = %path.display(), "Root token written");
    Ok(())
}
