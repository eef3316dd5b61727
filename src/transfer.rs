//! Local files that object data is uploaded from or downloaded to

use crate::{builder::Arguments, Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::{fs, io};

#[derive(Debug)]
pub struct Upload {
    pub path: Utf8PathBuf,
    pub mime_type: String,
}

impl Upload {
    pub fn read(&self) -> Result<bytes::Bytes> {
        fs::read(&self.path)
            .map(bytes::Bytes::from)
            .map_err(|source| Error::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[derive(Debug)]
pub struct Download {
    pub path: Utf8PathBuf,
    pub overwrite: bool,
}

impl Download {
    /// Writes everything from the reader into the target file. If the reader
    /// fails partway the partial file is removed, so it can't block a retry
    pub fn write(&self, mut reader: impl io::Read) -> Result<u64> {
        let mut file = self.open()?;

        match io::copy(&mut reader, &mut file) {
            Ok(size) => Ok(size),
            Err(source) => {
                drop(file);

                if let Err(err) = fs::remove_file(&self.path) {
                    tracing::warn!(path = %self.path, %err, "failed to remove partial download");
                }

                Err(Error::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    fn open(&self) -> Result<fs::File> {
        let mut oo = fs::OpenOptions::new();
        oo.write(true);

        if self.overwrite {
            oo.create(true).truncate(true);
        } else {
            oo.create_new(true);
        }

        oo.open(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::AlreadyExists {
                Error::FileExists(self.path.clone())
            } else {
                Error::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })
    }
}

/// The optional upload source and download sink of a single invocation
#[derive(Debug, Default)]
pub struct Transfer {
    pub upload: Option<Upload>,
    pub download: Option<Download>,
}

impl Transfer {
    /// Gathers the media flags, verifying that the upload source exists and
    /// that the download target won't clobber an existing file unless asked to
    pub fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let media = args.spec().media;
        let mut transfer = Self::default();

        if media.can_upload() {
            if let Some(path) = nonempty(args.text("upload_filename")) {
                let path = Utf8PathBuf::from(path);

                if let Err(source) = fs::metadata(&path) {
                    return Err(Error::Io { path, source });
                }

                let mime_type = nonempty(args.text("upload_mime_type"))
                    .unwrap_or_else(|| guess_mime_type(&path).to_owned());

                transfer.upload = Some(Upload { path, mime_type });
            }
        }

        if media.can_download() {
            if let Some(path) = nonempty(args.text("download_filename")) {
                let path = Utf8PathBuf::from(path);
                let overwrite = args.switch("overwrite")?.unwrap_or(false);

                if !overwrite && path.exists() {
                    return Err(Error::FileExists(path));
                }

                transfer.download = Some(Download { path, overwrite });
            }
        }

        Ok(transfer)
    }
}

#[inline]
fn nonempty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Guesses the MIME type of a file from its extension
pub fn guess_mime_type(path: &Utf8Path) -> &'static str {
    let ext = path.extension().map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("txt" | "log") => "text/plain",
        Some("htm" | "html") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("yaml" | "yml") => "application/yaml",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "tgz") => "application/gzip",
        Some("tar") => "application/x-tar",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        _ => {
            tracing::warn!(%path, "unable to determine MIME type, falling back to application/octet-stream");
            "application/octet-stream"
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn guesses_mime_types() {
        assert_eq!(guess_mime_type(Utf8Path::new("dir/notes.TXT")), "text/plain");
        assert_eq!(guess_mime_type(Utf8Path::new("image.jpeg")), "image/jpeg");
        assert_eq!(
            guess_mime_type(Utf8Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    /// Yields a few bytes, then fails like a dropped connection
    struct Truncated {
        sent: bool,
    }

    impl io::Read for Truncated {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }

            self.sent = true;
            let n = buf.len().min(4);
            buf[..n].copy_from_slice(&b"part"[..n]);
            Ok(n)
        }
    }

    #[test]
    fn failed_download_leaves_nothing_behind() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(td.path().join("object.bin")).unwrap();

        let dl = Download {
            path: path.clone(),
            overwrite: false,
        };

        assert!(matches!(
            dl.write(Truncated { sent: false }),
            Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::ConnectionReset
        ));
        assert!(!path.exists());

        // A retry isn't blocked by the earlier attempt
        assert_eq!(dl.write(&b"complete"[..]).unwrap(), 8);
        assert_eq!(fs::read_to_string(&path).unwrap(), "complete");
    }

    #[test]
    fn download_refuses_to_clobber() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(td.path().join("existing")).unwrap();
        fs::write(&path, "original").unwrap();

        let dl = Download {
            path: path.clone(),
            overwrite: false,
        };
        assert!(matches!(dl.write(&b"new"[..]), Err(Error::FileExists(p)) if p == path));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");

        let dl = Download {
            path: path.clone(),
            overwrite: true,
        };
        assert_eq!(dl.write(&b"new"[..]).unwrap(), 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
