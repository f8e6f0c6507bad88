use crate::error::IngestError;
use crate::reader::Dataset;

/// The loaded exports, keyed by file name, in load order.
#[derive(Debug, Clone, Default)]
pub struct ProjectSet {
    datasets: Vec<Dataset>,
}

impl ProjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset. A dataset with the same name is replaced in place, so
    /// the original load position is kept.
    pub fn insert(&mut self, dataset: Dataset) {
        match self.datasets.iter_mut().find(|d| d.name == dataset.name) {
            Some(existing) => {
                tracing::warn!(project = %dataset.name, "Replacing previously loaded project with the same name");
                *existing = dataset;
            }
            None => self.datasets.push(dataset),
        }
    }

    /// Returns the named project, or the first loaded one when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<&Dataset, IngestError> {
        let first = self.datasets.first().ok_or(IngestError::NoProjects)?;
        match name {
            None => Ok(first),
            Some(wanted) => self
                .datasets
                .iter()
                .find(|d| d.name == wanted)
                .ok_or_else(|| IngestError::UnknownProject {
                    name: wanted.to_string(),
                    available: self.names().join(", "),
                }),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.datasets.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
