//! Static Directory Handler
//!
//! Serves files below a base directory. A directory request serves its
//! `index.html` when readable and otherwise renders an HTML listing. Paths
//! that resolve outside the base directory are refused with 403.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{MidwareError, Result};
use crate::http::{Request, Response};
use crate::middleware::Handler;

/// Files tried, in order, before listing a directory.
const INDEX_FILES: &[&str] = &["index.html"];

/// Serves the unconsumed request path relative to `base`.
#[derive(Debug, Clone)]
pub struct StaticDir {
    base: PathBuf,
}

impl StaticDir {
    /// Resolves `base` to its canonical form.
    ///
    /// # Errors
    /// `InvalidConfig` when `base` does not exist or cannot be resolved.
    pub fn new(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let base = fs::canonicalize(base).map_err(|err| {
            MidwareError::InvalidConfig(format!("static directory {}: {}", base.display(), err))
        })?;
        Ok(Self { base })
    }

    // == Resolve ==
    /// Maps a percent-decoded relative path to a location inside `base`.
    ///
    /// `None` means the path escapes `base`, either through `..` or through a
    /// symlink. A path that does not exist resolves lexically.
    fn resolve(&self, rel: &str) -> Option<PathBuf> {
        let mut lexical = self.base.clone();
        for component in Path::new(rel.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => lexical.push(part),
                Component::ParentDir => {
                    lexical.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        if !lexical.starts_with(&self.base) {
            return None;
        }

        match fs::canonicalize(&lexical) {
            Ok(real) if real.starts_with(&self.base) => Some(real),
            Ok(_) => None,
            Err(_) => Some(lexical),
        }
    }

    fn serve_file(path: &Path) -> Response {
        match fs::read(path) {
            Ok(body) => Response::ok(body),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Response::not_found(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read file");
                Response::create(500, "Internal Server Error")
            }
        }
    }

    // == Listing ==
    /// HTML table of the directory's entries sorted by name.
    fn listing(dir: &Path, url_base: &str) -> io::Result<String> {
        let mut names: Vec<String> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        let mut rows = String::new();
        for name in &names {
            let (mode, size) = match fs::symlink_metadata(dir.join(name)) {
                Ok(meta) => (mode_letters(&meta.file_type()), meta.len()),
                Err(_) => (String::new(), 0),
            };
            rows.push_str(&format!(
                "<tr><td><a href=\"{}/{}\">{}</a></td><td>{}</td><td>{}</td></tr>\n",
                url_base,
                urlencoding::encode(name),
                escape_html(name),
                mode,
                size
            ));
        }

        Ok(format!(
            "<html><head>\n\
             <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\"/>\n\
             </head><body><table><thead><tr><td>file name</td><td>file mode</td>\n\
             <td>file size</td></tr></thead><tbody>\n{}</tbody></table></body></html>",
            rows
        ))
    }
}

impl Handler for StaticDir {
    fn handle(&self, req: &mut Request) -> Option<Response> {
        let Ok(rel) = urlencoding::decode(&req.path) else {
            return Some(Response::create(400, "Bad Request"));
        };
        let Some(real) = self.resolve(&rel) else {
            warn!(path = %req.url_path(), "path escapes static directory");
            return Some(Response::create(403, "Forbidden"));
        };
        debug!(path = %real.display(), "static lookup");

        if !real.is_dir() {
            return Some(Self::serve_file(&real));
        }
        for index in INDEX_FILES {
            if let Ok(body) = fs::read(real.join(index)) {
                return Some(Response::ok(body));
            }
        }

        let url_base = req.url_path().trim_end_matches('/');
        match Self::listing(&real, url_base) {
            Ok(html) => Some(
                Response::ok(html).with_header("Content-Type", "text/html; charset=utf-8"),
            ),
            Err(err) => {
                warn!(path = %real.display(), error = %err, "cannot list directory");
                Some(Response::create(500, "Internal Server Error"))
            }
        }
    }
}

/// `d`, `f`, `l` or `s` for directories, files, symlinks and sockets.
fn mode_letters(file_type: &fs::FileType) -> String {
    let mut letters = String::new();
    if file_type.is_dir() {
        letters.push('d');
    }
    if file_type.is_file() {
        letters.push('f');
    }
    if file_type.is_symlink() {
        letters.push('l');
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if file_type.is_socket() {
            letters.push('s');
        }
    }
    letters
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
