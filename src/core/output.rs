use tracing::{debug, warn};

use crate::core::outcome::{FailureKind, Outcome};
use crate::core::provision::Provisioner;
use crate::platform::traits::{FileSystem, PathNormalizer};

/// Render content and write it to `path`, provisioning the file first.
///
/// Rendering happens entirely in memory before the target is touched, so a
/// failing `render` or a failed provisioning step leaves no partial output.
/// A failed provisioning outcome is returned unchanged.
pub fn write_rendered<F, N, R>(
    provisioner: &Provisioner<F, N>,
    path: &str,
    render: R,
) -> Outcome<()>
where
    F: FileSystem,
    N: PathNormalizer,
    R: FnOnce(&mut String) -> anyhow::Result<()>,
{
    let mut rendered = String::new();
    if let Err(e) = render(&mut rendered) {
        warn!("Rendering for {:?} failed: {:#}", path, e);
        return Outcome::failure(FailureKind::RenderFailed, format!("{:#}", e));
    }

    let target = match provisioner.ensure_file_resolved(path) {
        Ok(target) => target,
        Err(failed) => return failed,
    };

    match provisioner.filesystem().write_file(&target.host_path(), rendered.as_bytes()) {
        Ok(()) => {
            debug!("Wrote {} bytes to {}", rendered.len(), target);
            Outcome::success()
        }
        Err(e) => {
            warn!("Failed to write {}: {}", target, e);
            Outcome::failure(FailureKind::WriteFailed, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::SeparatorNormalizer;
    use crate::platform::memory::{MemoryFileSystem, Operation};
    use std::fmt::Write as _;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn memory() -> Provisioner<MemoryFileSystem> {
        Provisioner::with_parts(MemoryFileSystem::new(), SeparatorNormalizer::default())
    }

    #[test]
    fn test_renders_into_new_file() {
        let dir = tempdir().unwrap();
        let provisioner = Provisioner::new();
        let target = format!("{}/site\\pages\\index.html", dir.path().display());

        let outcome = write_rendered(&provisioner, &target, |out| {
            write!(out, "<h1>{}</h1>", "hello")?;
            Ok(())
        });

        assert!(outcome.is_success(), "{}", outcome);
        let written = std::fs::read_to_string(dir.path().join("site/pages/index.html")).unwrap();
        assert_eq!(written, "<h1>hello</h1>");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let provisioner = memory();
        provisioner.filesystem().seed_file("out/a.txt", b"old contents that are longer");

        let outcome = write_rendered(&provisioner, "out/a.txt", |out| {
            out.push_str("new");
            Ok(())
        });

        assert!(outcome.is_success());
        assert_eq!(provisioner.filesystem().contents("out/a.txt"), Some(b"new".to_vec()));
    }

    #[test]
    fn test_render_failure_touches_nothing() {
        let provisioner = memory();

        let outcome = write_rendered(&provisioner, "out/a.txt", |out| {
            out.push_str("half");
            anyhow::bail!("missing variable `title`")
        });

        assert_eq!(outcome.kind(), Some(FailureKind::RenderFailed));
        assert!(outcome.message().contains("title"));
        assert!(provisioner.filesystem().journal().is_empty());
    }

    #[test]
    fn test_provisioning_failure_is_forwarded() {
        let provisioner = memory();
        provisioner.filesystem().seed_dir("out/a.txt");

        let outcome = write_rendered(&provisioner, "out/a.txt", |out| {
            out.push_str("body");
            Ok(())
        });

        assert_eq!(outcome.kind(), Some(FailureKind::NameCollision));
        assert_eq!(outcome.message(), provisioner.ensure_file("out/a.txt").message());
        assert!(provisioner.filesystem().journal().is_empty());
    }

    #[test]
    fn test_write_failure_reported() {
        let provisioner = memory();
        provisioner.filesystem().deny_writes(true);

        let outcome = write_rendered(&provisioner, "report.txt", |out| {
            out.push_str("body");
            Ok(())
        });

        assert_eq!(outcome.kind(), Some(FailureKind::WriteFailed));
        assert_eq!(
            provisioner.filesystem().journal(),
            vec![
                Operation::CreateFile(PathBuf::from("report.txt")),
                Operation::WriteFile(PathBuf::from("report.txt")),
            ]
        );
    }

    #[test]
    fn test_writes_to_normalized_target_once() {
        let provisioner = memory();

        let outcome = write_rendered(&provisioner, "reports\\\\q1//sum*mary.txt", |out| {
            out.push_str("total");
            Ok(())
        });

        assert!(outcome.is_success(), "{}", outcome);
        assert_eq!(
            provisioner.filesystem().contents("reports/q1/summary.txt"),
            Some(b"total".to_vec())
        );
        assert_eq!(
            provisioner.filesystem().journal(),
            vec![
                Operation::CreateDirAll(PathBuf::from("reports/q1")),
                Operation::CreateFile(PathBuf::from("reports/q1/summary.txt")),
                Operation::WriteFile(PathBuf::from("reports/q1/summary.txt")),
            ]
        );
    }

    #[test]
    fn test_rejected_path_touches_nothing() {
        let provisioner = memory();

        let outcome = write_rendered(&provisioner, "*?", |out| {
            out.push_str("body");
            Ok(())
        });

        assert_eq!(outcome.kind(), Some(FailureKind::InvalidPath));
        assert!(provisioner.filesystem().journal().is_empty());
    }
}
