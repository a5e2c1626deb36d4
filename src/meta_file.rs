use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};

// <name>.w.xml, <name>.a.xml, <name>.b.xml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFile {
    pub name: String,
    pub w_file: PathBuf,
    pub a_file: PathBuf,
    pub b_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaXml {
    pub name: String,
    pub w_xml: String,
    pub a_xml: String,
    pub b_xml: String,
}

pub fn read_meta_file(meta_file: &MetaFile) -> Result<MetaXml> {
    Ok(MetaXml {
        name: meta_file.name.clone(),
        w_xml: read_xml(&meta_file.w_file)?,
        a_xml: read_xml(&meta_file.a_file)?,
        b_xml: read_xml(&meta_file.b_file)?,
    })
}

fn read_xml(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    // strips a BOM if any
    let (xml, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    ensure!(!had_errors, "{} is not valid UTF-8", path.display());

    Ok(xml.into_owned())
}

pub fn find_meta_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<MetaFile>> {
    let mut groups: BTreeMap<String, BTreeMap<String, PathBuf>> = BTreeMap::new();

    for path in paths {
        let path = path.as_ref();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.ends_with(".xml") {
            continue;
        }

        groups
            .entry(base_name(file_name).to_owned())
            .or_default()
            .insert(file_name.to_owned(), path.to_path_buf());
    }

    group_meta_files(groups)
}

pub fn find_meta_files_in_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<MetaFile>> {
    let dir = dir.as_ref();

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Cannot read directory {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }

    find_meta_files(&paths)
}

// "doc12.w.xml" => "doc12"
fn base_name(file_name: &str) -> &str {
    match file_name.find('.') {
        Some(i) => &file_name[..i],
        None => file_name,
    }
}

fn group_meta_files(groups: BTreeMap<String, BTreeMap<String, PathBuf>>) -> Result<Vec<MetaFile>> {
    let mut meta_files = Vec::with_capacity(groups.len());

    for (name, mut files) in groups {
        let mut take = |layer: &str| {
            let file_name = format!("{}.{}.xml", name, layer);
            files
                .remove(&file_name)
                .with_context(|| format!("File {} expected but not found", file_name))
        };

        let w_file = take("w")?;
        let a_file = take("a")?;
        let b_file = take("b")?;

        meta_files.push(MetaFile {
            name,
            w_file,
            a_file,
            b_file,
        });
    }

    Ok(meta_files)
}
