use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use roxmltree::{Document, Node};

use crate::mob::Vec2;

use super::diagnostics::{ContentLoadError, SourceLocation};

pub(crate) fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|source| ContentLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_document<'input>(
    path: &Path,
    raw: &'input str,
) -> Result<Document<'input>, ContentLoadError> {
    Document::parse(raw).map_err(|error| ContentLoadError::Xml {
        path: path.to_path_buf(),
        location: SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        },
        message: error.to_string(),
    })
}

/// Field readers for one parsed file, reporting errors with its path and
/// the node position.
pub(crate) struct XmlFile<'a, 'input> {
    pub path: &'a Path,
    pub doc: &'a Document<'input>,
}

impl<'a, 'input> XmlFile<'a, 'input> {
    pub fn location(&self, node: Node<'_, '_>) -> SourceLocation {
        self.location_at(node.range().start)
    }

    pub fn location_at(&self, offset: usize) -> SourceLocation {
        let pos = self.doc.text_pos_at(offset);
        SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }
    }

    pub fn expect_root(&self, name: &'static str) -> Result<Node<'a, 'input>, ContentLoadError> {
        let root = self.doc.root_element();
        if root.tag_name().name() != name {
            return Err(ContentLoadError::InvalidRoot {
                path: self.path.to_path_buf(),
                expected: name,
                location: self.location(root),
            });
        }
        Ok(root)
    }

    pub fn missing(&self, node: Node<'_, '_>, field: &str) -> ContentLoadError {
        ContentLoadError::MissingField {
            path: self.path.to_path_buf(),
            field: field.to_string(),
            location: self.location(node),
        }
    }

    pub fn unknown_field(&self, node: Node<'_, '_>) -> ContentLoadError {
        ContentLoadError::UnknownField {
            path: self.path.to_path_buf(),
            field: node.tag_name().name().to_string(),
            location: self.location(node),
        }
    }

    pub fn invalid(&self, node: Node<'_, '_>, field: &str, value: &str) -> ContentLoadError {
        ContentLoadError::InvalidValue {
            path: self.path.to_path_buf(),
            field: field.to_string(),
            value: value.to_string(),
            location: self.location(node),
        }
    }

    pub fn required_attr<'n>(
        &self,
        node: Node<'n, '_>,
        name: &str,
    ) -> Result<&'n str, ContentLoadError> {
        node.attribute(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| self.missing(node, name))
    }

    pub fn attr<T: FromStr>(
        &self,
        node: Node<'_, '_>,
        name: &str,
        default: T,
    ) -> Result<T, ContentLoadError> {
        match node.attribute(name) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|_| self.invalid(node, name, raw)),
            None => Ok(default),
        }
    }

    pub fn text<T: FromStr>(&self, node: Node<'_, '_>) -> Result<T, ContentLoadError> {
        let field = node.tag_name().name();
        let raw = node.text().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(self.missing(node, field));
        }
        raw.parse::<T>().map_err(|_| self.invalid(node, field, raw))
    }

    /// Reads `x,y`.
    pub fn attr_point(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<Option<Vec2>, ContentLoadError> {
        let Some(raw) = node.attribute(name) else {
            return Ok(None);
        };
        parse_point(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(node, name, raw))
    }

    /// Reads space separated `x,y` pairs.
    pub fn attr_points(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<Option<Vec<Vec2>>, ContentLoadError> {
        let Some(raw) = node.attribute(name) else {
            return Ok(None);
        };
        raw.split_whitespace()
            .map(parse_point)
            .collect::<Option<Vec<_>>>()
            .map(Some)
            .ok_or_else(|| self.invalid(node, name, raw))
    }
}

fn parse_point(raw: &str) -> Option<Vec2> {
    let (x, y) = raw.trim().split_once(',')?;
    Some(Vec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Splits a name list on semicolons and whitespace.
pub(crate) fn name_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every `.xml` file under `root`, sorted by relative path.
pub fn collect_xml_files_sorted(root: &Path) -> Result<Vec<PathBuf>, ContentLoadError> {
    let mut files = Vec::<PathBuf>::new();
    collect_recursive(root, &mut files)?;
    files.sort_by_key(|path| normalize_rel_path(path.strip_prefix(root).unwrap_or(path)));
    Ok(files)
}

fn collect_recursive(current: &Path, files: &mut Vec<PathBuf>) -> Result<(), ContentLoadError> {
    let io_error = |source| ContentLoadError::Io {
        path: current.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(current).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_recursive(&path, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            files.push(path);
        }
    }
    Ok(())
}

fn normalize_rel_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn name_lists_accept_semicolons_and_spaces() {
        assert_eq!(
            name_list("dying; sprout  plucking;"),
            vec!["dying", "sprout", "plucking"]
        );
    }

    #[test]
    fn points_need_both_coordinates() {
        assert_eq!(parse_point(" 3, -4 "), Some(Vec2::new(3.0, -4.0)));
        assert_eq!(parse_point("3"), None);
    }

    #[test]
    fn xml_files_are_found_recursively_in_path_order() {
        let temp = TempDir::new().expect("temp");
        let nested = temp.path().join("pikmin");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("red.xml"), "<MobType/>").expect("write");
        fs::write(temp.path().join("bulborb.XML"), "<MobType/>").expect("write");
        fs::write(temp.path().join("notes.txt"), "").expect("write");

        let files = collect_xml_files_sorted(temp.path()).expect("collect");
        let names: Vec<_> = files
            .iter()
            .map(|path| normalize_rel_path(path.strip_prefix(temp.path()).expect("under root")))
            .collect();
        assert_eq!(names, vec!["bulborb.XML", "pikmin/red.xml"]);
    }

    #[test]
    fn bad_numbers_report_the_field() {
        let raw = r#"<MobType radius="wide"/>"#;
        let path = Path::new("x.xml");
        let doc = parse_document(path, raw).expect("parse");
        let xml = XmlFile { path, doc: &doc };
        let err = xml
            .attr(doc.root_element(), "radius", 1.0f32)
            .expect_err("invalid");
        assert!(matches!(
            err,
            ContentLoadError::InvalidValue { ref field, ref value, .. }
                if field == "radius" && value == "wide"
        ));
    }
}
