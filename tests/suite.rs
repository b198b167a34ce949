use std::collections::HashSet;

use {
    anyhow::Context,
    serde::{de::DeserializeOwned, Deserialize},
};

/// An input for the id extraction strategies, from `testdata/ids.toml`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdTest {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub span: Option<[usize; 2]>,
}

/// A document scanned for labeled ids, from `testdata/scan.toml`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanTest {
    pub name: String,
    pub document: String,
    pub entries: Vec<ScanEntry>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanEntry {
    pub label: String,
    pub id: String,
    pub span: [usize; 2],
}

/// A match count every engine must agree on, from `testdata/counts.toml`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountTest {
    pub name: String,
    pub pattern: String,
    pub haystack: String,
    pub count: usize,
    #[serde(default, rename = "rejected-by")]
    pub rejected_by: Vec<String>,
}

pub fn ids() -> anyhow::Result<Vec<IdTest>> {
    let tests: Vec<IdTest> =
        load("ids", include_str!("../testdata/ids.toml"))?;
    unique("ids", tests.iter().map(|t| &*t.name))?;
    Ok(tests)
}

pub fn scans() -> anyhow::Result<Vec<ScanTest>> {
    let tests: Vec<ScanTest> =
        load("scan", include_str!("../testdata/scan.toml"))?;
    unique("scan", tests.iter().map(|t| &*t.name))?;
    Ok(tests)
}

pub fn counts() -> anyhow::Result<Vec<CountTest>> {
    let tests: Vec<CountTest> =
        load("counts", include_str!("../testdata/counts.toml"))?;
    unique("counts", tests.iter().map(|t| &*t.name))?;
    Ok(tests)
}

#[derive(Deserialize)]
struct TestFile<T> {
    #[serde(rename = "test")]
    tests: Vec<T>,
}

fn load<T: DeserializeOwned>(
    group_name: &str,
    data: &str,
) -> anyhow::Result<Vec<T>> {
    let file: TestFile<T> = toml::from_str(data).with_context(|| {
        format!("error decoding TOML for '{}'", group_name)
    })?;
    Ok(file.tests)
}

fn unique<'a>(
    group_name: &str,
    names: impl Iterator<Item = &'a str>,
) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        anyhow::ensure!(
            seen.insert(name),
            "found duplicate tests for name '{}/{}'",
            group_name,
            name,
        );
    }
    Ok(())
}
