use derive_new::new;
use serde::Deserialize;
use std::{collections::BTreeMap, path::PathBuf, str::Split};

/// A folder of documents
#[derive(Default, Debug, Clone, Deserialize)]
pub struct Folder {
    /// The directory to save the rendered files to
    #[serde(default)]
    save_dir: Option<PathBuf>,

    /// The subfolders from this folder
    #[serde(default)]
    sub: BTreeMap<String, Folder>,
}

/// Where a folder reads documents from and writes HTML to
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Location {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// The type of file
#[derive(Debug)]
pub enum PathValidity<'a> {
    Invalid,
    File(Location, &'a str),
    Folder(Location),
}

fn is_valid_file_name(name: &str) -> bool {
    !name.starts_with('.') && !name.contains('\\')
}

/// Checks the name for validity
impl Folder {
    fn check_name_iter<'a>(
        &self,
        mut iter: Split<'a, char>,
        curr: &'a str,
        mut loc: Location,
    ) -> PathValidity<'a> {
        if let Some(base) = &self.save_dir {
            loc.output = base.clone();
        }
        match iter.next() {
            Some(next) => {
                // if there is a next file name
                if let Some(sub) = self.sub.get(curr) {
                    loc.source.push(curr);
                    loc.output.push(curr);
                    sub.check_name_iter(iter, next, loc)
                } else {
                    PathValidity::Invalid
                }
            }
            None if curr.is_empty() => {
                // curr is the file name
                PathValidity::Folder(loc)
            }
            None if is_valid_file_name(curr) => PathValidity::File(loc, curr),
            None => PathValidity::Invalid,
        }
    }

    /// Resolve a document path like `/tours/alpine` against this folder
    pub fn check_name<'a>(&self, path: &'a str, loc: Location) -> PathValidity<'a> {
        let mut iter = path.split('/');
        if let Some("") = iter.next() {
            if let Some(curr) = iter.next() {
                self.check_name_iter(iter, curr, loc)
            } else {
                PathValidity::Invalid
            }
        } else {
            PathValidity::Invalid
        }
    }

    /// The locations of this folder and all of its subfolders
    pub fn locations(&self, mut loc: Location) -> Vec<Location> {
        if let Some(base) = &self.save_dir {
            loc.output = base.clone();
        }
        let mut list = vec![loc.clone()];
        for (name, sub) in &self.sub {
            let sub_loc = Location::new(loc.source.join(name), loc.output.join(name));
            list.extend(sub.locations(sub_loc));
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::{Folder, Location, PathValidity};
    use std::path::PathBuf;

    fn tree() -> Folder {
        toml::from_str(
            r#"
            [sub.tours]
            [sub.tours.sub.europe]
            [sub.blog]
            save_dir = "www/news"
            "#,
        )
        .unwrap()
    }

    fn root() -> Location {
        Location::new(PathBuf::from("content"), PathBuf::from("public"))
    }

    #[test]
    fn test_check_name() {
        let folder = tree();
        match folder.check_name("/tours/europe/alps", root()) {
            PathValidity::File(loc, name) => {
                assert_eq!(name, "alps");
                assert_eq!(loc.source, PathBuf::from("content/tours/europe"));
                assert_eq!(loc.output, PathBuf::from("public/tours/europe"));
            }
            other => panic!("expected a file, got {:?}", other),
        }
        match folder.check_name("/blog/launch", root()) {
            PathValidity::File(loc, _) => {
                assert_eq!(loc.source, PathBuf::from("content/blog"));
                assert_eq!(loc.output, PathBuf::from("www/news"));
            }
            other => panic!("expected a file, got {:?}", other),
        }
        match folder.check_name("/tours/", root()) {
            PathValidity::Folder(loc) => assert_eq!(loc.source, PathBuf::from("content/tours")),
            other => panic!("expected a folder, got {:?}", other),
        }
        assert!(matches!(folder.check_name("/", root()), PathValidity::Folder(..)));
    }

    #[test]
    fn test_invalid_names() {
        let folder = tree();
        for path in &["tours/alps", "", "/cruises/nile", "/tours/..", "/.secret"] {
            assert!(
                matches!(folder.check_name(path, root()), PathValidity::Invalid),
                "{} should be invalid",
                path
            );
        }
    }

    #[test]
    fn test_locations() {
        let sources: Vec<_> = tree()
            .locations(root())
            .into_iter()
            .map(|loc| (loc.source, loc.output))
            .collect();
        assert_eq!(
            sources,
            vec![
                (PathBuf::from("content"), PathBuf::from("public")),
                (PathBuf::from("content/blog"), PathBuf::from("www/news")),
                (PathBuf::from("content/tours"), PathBuf::from("public/tours")),
                (
                    PathBuf::from("content/tours/europe"),
                    PathBuf::from("public/tours/europe")
                ),
            ]
        );
    }
}
