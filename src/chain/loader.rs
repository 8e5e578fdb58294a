//! Chain definition loader
//!
//! Load chain YAML files from disk, singly or a directory at a time.

use std::path::Path;

use super::Chain;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },
}

pub struct ChainLoader;

impl ChainLoader {
    pub fn load_directory(dir: &Path) -> Result<Vec<Chain>, LoadError> {
        let mut chains = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());
                let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

                // Skip providers.yaml - it configures backends, not a chain
                if filename == "providers.yaml" || filename == "providers.yml" {
                    continue;
                }

                if ext == Some("yaml") || ext == Some("yml") {
                    let content = std::fs::read_to_string(&path)?;
                    let chain: Chain =
                        serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
                            file: path.display().to_string(),
                            error: e,
                        })?;
                    chains.push(chain);
                }
            }
        }

        Ok(chains)
    }

    pub fn load_file(path: &Path) -> Result<Chain, LoadError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            file: path.display().to_string(),
            error: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_directory() {
        let dir = tempdir().unwrap();

        fs::write(
            dir.path().join("chain1.yaml"),
            r#"
name: chain-1
steps:
  - kind: text_to_image
    params:
      prompt: "a lighthouse at dusk"
"#,
        )
        .unwrap();

        fs::write(
            dir.path().join("chain2.yml"),
            r#"
name: chain-2
steps:
  - kind: text_to_image
  - kind: image_to_video
"#,
        )
        .unwrap();

        fs::write(dir.path().join("not-a-chain.txt"), "ignored").unwrap();

        let chains = ChainLoader::load_directory(dir.path()).unwrap();
        assert_eq!(chains.len(), 2);

        let names: Vec<_> = chains.iter().filter_map(|c| c.name.as_deref()).collect();
        assert!(names.contains(&"chain-1"));
        assert!(names.contains(&"chain-2"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.yaml");

        fs::write(
            &path,
            r#"
name: single-chain
steps:
  - kind: text_to_image
"#,
        )
        .unwrap();

        let chain = ChainLoader::load_file(&path).unwrap();
        assert_eq!(chain.name.as_deref(), Some("single-chain"));
    }
}
