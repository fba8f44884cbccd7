use serde::Serialize;

#[derive(Serialize)]
pub struct FolderStatusQuery<'a> {
    pub folder: &'a str,
}
