//! Page component existence checks.

use super::InertiaConfig;
use crate::error::{InertiaError, Result};
use std::path::PathBuf;

/// Candidate files for `component`, in search order.
///
/// `/` in the component name maps to a directory separator.
pub fn component_candidates(config: &InertiaConfig, component: &str) -> Vec<PathBuf> {
    let relative: PathBuf = component.split('/').collect();
    let mut candidates = Vec::with_capacity(config.page_paths.len() * config.page_extensions.len());

    for base in &config.page_paths {
        let base = config.resolve_path(base);
        for extension in &config.page_extensions {
            let mut file = relative.clone().into_os_string();
            file.push(extension);
            candidates.push(base.join(file));
        }
    }
    candidates
}

/// Fail with [`InertiaError::ComponentNotFound`] unless a file exists for `component`.
pub fn ensure_component_exists(config: &InertiaConfig, component: &str) -> Result<()> {
    if component_candidates(config, component).iter().any(|p| p.is_file()) {
        return Ok(());
    }
    tracing::debug!(component, "no page file found");
    Err(InertiaError::ComponentNotFound {
        component: component.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &std::path::Path) -> InertiaConfig {
        InertiaConfig::default()
            .with_content_root(root)
            .with_ensure_pages_exist(true)
    }

    #[test]
    fn test_finds_nested_component() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/Pages/Users")).unwrap();
        std::fs::write(dir.path().join("src/Pages/Users/Index.vue"), "").unwrap();

        assert!(ensure_component_exists(&config(dir.path()), "Users/Index").is_ok());
    }

    #[test]
    fn test_missing_component() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_component_exists(&config(dir.path()), "Missing/Page").unwrap_err();
        match err {
            InertiaError::ComponentNotFound { component } => assert_eq!(component, "Missing/Page"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_candidates_cover_every_path_and_extension() {
        let config = InertiaConfig::default()
            .with_content_root("/app")
            .with_page_paths(["~/pages", "/abs"])
            .with_page_extensions([".tsx", ".vue"]);

        let candidates = component_candidates(&config, "Auth/Login");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/app/pages/Auth/Login.tsx"),
                PathBuf::from("/app/pages/Auth/Login.vue"),
                PathBuf::from("/abs/Auth/Login.tsx"),
                PathBuf::from("/abs/Auth/Login.vue"),
            ]
        );
    }
}
