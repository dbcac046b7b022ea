//! CRUD clients for the dashboard's resource groups

use super::{ApiClient, ClientError};
use crate::types::{ListQuery, Page, StatusUpdate};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// Backend resource groups behind the admin screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Contacts,
    Quotes,
    Testimonials,
    Blog,
    Gallery,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Contacts,
        ResourceKind::Quotes,
        ResourceKind::Testimonials,
        ResourceKind::Blog,
        ResourceKind::Gallery,
    ];

    /// Path of the collection, relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Contacts => "/contacts",
            Self::Quotes => "/quotes",
            Self::Testimonials => "/testimonials",
            Self::Blog => "/blogs",
            Self::Gallery => "/gallery",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Quotes => "quotes",
            Self::Testimonials => "testimonials",
            Self::Blog => "blog",
            Self::Gallery => "gallery",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.path().trim_start_matches('/') == s)
            .ok_or_else(|| format!("unknown resource: {s}"))
    }
}

/// File sent as multipart form data
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
    /// Extra text fields sent alongside the file (e.g. title, category)
    pub fields: Vec<(String, String)>,
}

impl Upload {
    /// Form field the file is attached under
    pub const FILE_FIELD: &'static str = "image";

    fn into_form(self) -> Result<Form, ClientError> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| ClientError::Configuration(format!("invalid mime type: {e}")))?;

        Ok(self
            .fields
            .into_iter()
            .fold(Form::new().part(Self::FILE_FIELD, part), |form, (key, value)| {
                form.text(key, value)
            }))
    }
}

/// Client for one resource group
#[derive(Clone)]
pub struct ResourceClient {
    inner: ApiClient,
    kind: ResourceKind,
}

impl ResourceClient {
    pub fn new(inner: ApiClient, kind: ResourceKind) -> Self {
        Self { inner, kind }
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.kind.path(), id)
    }

    /// List one page of records
    pub async fn list<T: DeserializeOwned>(&self, query: &ListQuery) -> Result<Page<T>, ClientError> {
        let request = self
            .inner
            .request(Method::GET, self.kind.path())
            .query(query);
        self.inner.execute_envelope(request).await
    }

    /// Fetch a single record
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T, ClientError> {
        let request = self.inner.request(Method::GET, &self.item_path(id));
        self.inner.execute_envelope(request).await
    }

    pub async fn create<B, T>(&self, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.request(Method::POST, self.kind.path()).json(body);
        self.inner.execute_envelope(request).await
    }

    pub async fn update<B, T>(&self, id: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .inner
            .request(Method::PUT, &self.item_path(id))
            .json(body);
        self.inner.execute_envelope(request).await
    }

    /// Move a record through its workflow (contact handled, quote accepted, testimonial approved)
    pub async fn set_status<T: DeserializeOwned>(
        &self,
        id: &str,
        status: impl Into<String>,
    ) -> Result<T, ClientError> {
        let request = self
            .inner
            .request(Method::PATCH, &format!("{}/status", self.item_path(id)))
            .json(&StatusUpdate {
                status: status.into(),
            });
        self.inner.execute_envelope(request).await
    }

    /// Delete a record, returning the backend's confirmation message
    pub async fn delete(&self, id: &str) -> Result<Option<String>, ClientError> {
        let request = self.inner.request(Method::DELETE, &self.item_path(id));
        self.inner.execute_ack(request).await
    }

    /// Create a record from an uploaded file
    pub async fn upload<T: DeserializeOwned>(&self, upload: Upload) -> Result<T, ClientError> {
        let request = self
            .inner
            .request(Method::POST, self.kind.path())
            .multipart(upload.into_form()?);
        self.inner.execute_envelope(request).await
    }
}
