use std::path::Path;
use std::path::PathBuf;

use chrono::Local;
use explorer_protocol::artifact::Artifact;
use explorer_protocol::turn::Turn;

/// Copy the turn's primary text to the system clipboard.
pub fn copy_turn_text(turn: &Turn) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(turn.text().to_string())?;
    Ok(())
}

/// Write the turn's artifact to `dir` and return the path. Image artifacts
/// are written byte-for-byte as downloaded from the provider; everything
/// else becomes a plain-text transcript.
pub fn export_turn(turn: &Turn, dir: &Path) -> anyhow::Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let path = match turn.artifact() {
        Some(Artifact::Image {
            image: Some(image), ..
        }) => {
            let path = dir.join(format!("{stamp}-{}", image.download_name()));
            std::fs::write(&path, &image.bytes)?;
            path
        }
        _ => {
            let path = dir.join(format!("response-{stamp}.txt"));
            std::fs::write(&path, turn.text())?;
            path
        }
    };
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_protocol::artifact::GeneratedImage;
    use explorer_protocol::turn::Capability;
    use pretty_assertions::assert_eq;

    #[test]
    fn exported_image_bytes_equal_the_stored_artifact() {
        let bytes = vec![0x89, 0x50, 0x4e, 0x47, 0x00, 0x01, 0x02];
        let turn = Turn::agent(
            Capability::Image,
            Artifact::Image {
                text: "Here you go.".to_string(),
                image: Some(GeneratedImage {
                    bytes: bytes.clone(),
                    file_name: "sunset".to_string(),
                    file_type: "png".to_string(),
                }),
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = export_turn(&turn, dir.path()).unwrap();
        assert!(path.to_string_lossy().ends_with("sunset.png"));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn text_artifacts_export_as_transcripts() {
        let turn = Turn::agent(
            Capability::Search,
            Artifact::SearchAnswer {
                text: "An answer.".to_string(),
                sources: Vec::new(),
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = export_turn(&turn, dir.path()).unwrap();
        assert!(path.to_string_lossy().ends_with(".txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "An answer.");
    }
}
