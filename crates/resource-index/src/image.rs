//! Image resources: the payload type used by map viewers.

use chrono::{DateTime, Duration, Utc};

use crate::index::{BatchReport, ResourceIndex};
use crate::resource::Resource;
use crate::variable::Variable;

/// A pre-rendered image addressed by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    /// Model run the image belongs to, if known.
    pub run: Option<DateTime<Utc>>,
    /// Forecast offset relative to the run.
    pub offset: Option<Duration>,
}

/// Arguments for [`ResourceIndex::append_image`].
#[derive(Debug, Clone)]
pub struct ImageSpec {
    pub variables: Vec<Variable>,
    /// Valid time. Derived from `run + offset` when absent.
    pub datetime: Option<DateTime<Utc>>,
    pub run: Option<DateTime<Utc>>,
    pub offset: Option<Duration>,
    pub url: String,
}

impl ImageSpec {
    pub fn new(variables: Vec<Variable>, url: impl Into<String>) -> Self {
        Self {
            variables,
            datetime: None,
            run: None,
            offset: None,
            url: url.into(),
        }
    }

    pub fn with_run(mut self, run: DateTime<Utc>, offset: Duration) -> Self {
        self.run = Some(run);
        self.offset = Some(offset);
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = Some(datetime);
        self
    }

    /// Valid time of the image.
    pub fn valid_time(&self) -> Option<DateTime<Utc>> {
        self.datetime.or_else(|| match (self.run, self.offset) {
            (Some(run), Some(offset)) => Some(run + offset),
            _ => None,
        })
    }

    pub fn into_resource(self) -> Resource<Image> {
        let datetime = self.valid_time();
        let resource = Resource::new(
            self.variables,
            Image {
                url: self.url,
                run: self.run,
                offset: self.offset,
            },
        );
        match datetime {
            Some(dt) => resource.with_datetime(dt),
            None => resource,
        }
    }
}

impl ResourceIndex<Image> {
    /// Shorthand for `append([spec.into_resource()])`.
    pub fn append_image(&mut self, spec: ImageSpec) -> BatchReport<Image> {
        self.append([spec.into_resource()])
    }
}
