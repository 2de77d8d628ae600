//! The resource model: queries, pagination and persistence for one kind.
//!
//! A [`Model`] borrows a [`Session`] and works on one [`ResourceKind`]. Each
//! operation asks the session for its current connection and headers, so a
//! model always targets the company file selected at the time of the call.
//!
//! # Pagination
//!
//! AccountRight pages collections and returns the URL of the following page
//! in `NextPageLink`. The model keeps that URL as its cursor; it reflects the
//! most recent query made through this model only.
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::rest::{QueryParams, Record};
//!
//! let mut customers = session.model("Customer")?;
//!
//! let page = customers.all(Some(&QueryParams::new().orderby("CompanyName"))).await?;
//! while customers.has_next_page() {
//!     let page = customers.next_page(None).await?;
//! }
//!
//! let created = customers
//!     .save(&Record::new().with("CompanyName", "Acme").with("IsIndividual", false))
//!     .await?;
//! ```

use serde_json::Value;

use crate::rest::{ModelError, QueryParams, Record, ResourceKind};
use crate::session::Session;

const NEXT_PAGE_LINK_KEY: &str = "NextPageLink";
const ITEMS_KEY: &str = "Items";

/// Resource model for one kind of record.
#[derive(Debug)]
pub struct Model<'s> {
    session: &'s Session,
    kind: ResourceKind,
    next_page_link: Option<String>,
}

impl<'s> Model<'s> {
    /// Creates a model for `kind` on `session`.
    #[must_use]
    pub const fn new(session: &'s Session, kind: ResourceKind) -> Self {
        Self {
            session,
            kind,
            next_page_link: None,
        }
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Returns the pagination cursor from the most recent query.
    #[must_use]
    pub fn next_page_link(&self) -> Option<&str> {
        self.next_page_link.as_deref()
    }

    /// Returns `true` if the most recent query reported another page.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page_link.is_some()
    }

    /// Builds the URL for this kind, optionally for one record.
    ///
    /// - The root kind resolves to the session's base URL.
    /// - Otherwise the route is appended to the selected company file's URI,
    ///   or to `{base_url}{company_file_id}` when no URI is known.
    /// - A record with a `UID` adds `/{uid}`.
    /// - Non-empty `params` add a query string.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoCompanyFileSelected`] for non-root kinds when
    /// no company file is selected.
    pub fn build_url(
        &self,
        record: Option<&Record>,
        params: Option<&QueryParams>,
    ) -> Result<String, ModelError> {
        let mut url = if self.kind.is_root() {
            self.session.base_url().to_string()
        } else {
            let company_file = self
                .session
                .company_file()
                .ok_or(ModelError::NoCompanyFileSelected)?;
            let mut url = company_file.resource_url(self.session.base_url(), self.kind.route());
            if let Some(id) = record.and_then(Record::id) {
                url.push('/');
                url.push_str(&id);
            }
            url
        };

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.push('?');
            url.push_str(&params.to_query_string());
        }

        Ok(url)
    }

    /// Fetches the collection for this kind.
    ///
    /// For non-root kinds the cursor is set from `NextPageLink`, or cleared
    /// when the response has none.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the URL cannot be built or the request fails.
    pub async fn all(&mut self, params: Option<&QueryParams>) -> Result<Value, ModelError> {
        let url = self.build_url(None, params)?;
        self.fetch_page(&url).await
    }

    /// Like [`all`](Self::all), but returns the `Items` array when the
    /// response is an object that has one.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the URL cannot be built or the request fails.
    pub async fn records(&mut self, params: Option<&QueryParams>) -> Result<Value, ModelError> {
        let response = self.all(params).await?;
        Ok(unwrap_items(response))
    }

    /// Fetches the page named by the cursor.
    ///
    /// Extra `params` are appended to the cursor URL.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoNextPage`] when there is no cursor, or the
    /// request error.
    pub async fn next_page(&mut self, params: Option<&QueryParams>) -> Result<Value, ModelError> {
        let mut url = self.next_page_link.clone().ok_or(ModelError::NoNextPage)?;
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&params.to_query_string());
        }
        self.fetch_page(&url).await
    }

    /// Fetches every page and concatenates their `Items`.
    ///
    /// A page without `Items` contributes nothing. There is no page limit.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnexpectedShape`] if a page's `Items` is not an
    /// array, or any request error.
    pub async fn all_items(
        &mut self,
        params: Option<&QueryParams>,
    ) -> Result<Vec<Value>, ModelError> {
        let first = self.all(params).await?;
        let mut items = take_items(first)?;

        while self.has_next_page() {
            let page = self.next_page(None).await?;
            items.extend(take_items(page)?);
        }

        tracing::debug!(kind = self.kind.name(), count = items.len(), "Fetched all pages");
        Ok(items)
    }

    /// Fetches one record by `UID`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the URL cannot be built or the request fails.
    pub async fn find(&self, id: &str) -> Result<Value, ModelError> {
        let url = self.build_url(Some(&Record::with_id(id)), None)?;
        let connection = self.session.connection().await?;
        let response = connection.get(&url, &self.session.headers()).await?;
        Ok(response.into_body())
    }

    /// Returns the first element of the collection, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnexpectedShape`] unless the response is an
    /// array or an object with an `Items` array, or any request error.
    pub async fn first(&mut self, params: Option<&QueryParams>) -> Result<Option<Value>, ModelError> {
        let response = self.all(params).await?;
        let items = match response {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove(ITEMS_KEY) {
                Some(Value::Array(items)) => items,
                _ => return Err(first_shape_error()),
            },
            _ => return Err(first_shape_error()),
        };
        Ok(items.into_iter().next())
    }

    /// Returns `true` if `record` has no `UID` yet.
    #[must_use]
    pub fn is_new_record(&self, record: &Record) -> bool {
        record.is_new()
    }

    /// Renders `record` as the JSON body sent to AccountRight.
    #[must_use]
    pub fn typecast(&self, record: &Record) -> Value {
        record.typecast()
    }

    /// Creates `record` if it is new, otherwise updates it.
    ///
    /// # Errors
    ///
    /// Returns the error from [`create`](Self::create) or
    /// [`update`](Self::update).
    pub async fn save(&self, record: &Record) -> Result<Value, ModelError> {
        if self.is_new_record(record) {
            self.create(record).await
        } else {
            self.update(record).await
        }
    }

    /// POSTs `record` to the collection URL.
    ///
    /// AccountRight answers with an empty body, returned as `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the URL cannot be built or the request fails.
    pub async fn create(&self, record: &Record) -> Result<Value, ModelError> {
        let url = self.build_url(None, None)?;
        let connection = self.session.connection().await?;
        tracing::debug!(kind = self.kind.name(), "Creating record");
        let response = connection
            .post(&url, &self.session.headers(), self.typecast(record))
            .await?;
        Ok(response.into_body())
    }

    /// PUTs `record` to its own URL.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingId`] if the record has no `UID`, or any
    /// request error.
    pub async fn update(&self, record: &Record) -> Result<Value, ModelError> {
        if record.is_new() {
            return Err(ModelError::MissingId);
        }
        let url = self.build_url(Some(record), None)?;
        let connection = self.session.connection().await?;
        tracing::debug!(kind = self.kind.name(), "Updating record");
        let response = connection
            .put(&url, &self.session.headers(), self.typecast(record))
            .await?;
        Ok(response.into_body())
    }

    /// DELETEs the record.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingId`] if the record has no `UID`, or any
    /// request error.
    pub async fn destroy(&self, record: &Record) -> Result<Value, ModelError> {
        if record.is_new() {
            return Err(ModelError::MissingId);
        }
        let url = self.build_url(Some(record), None)?;
        let connection = self.session.connection().await?;
        tracing::debug!(kind = self.kind.name(), "Deleting record");
        let response = connection.delete(&url, &self.session.headers()).await?;
        Ok(response.into_body())
    }

    async fn fetch_page(&mut self, url: &str) -> Result<Value, ModelError> {
        let connection = self.session.connection().await?;
        let response = connection.get(url, &self.session.headers()).await?;
        let body = response.into_body();

        self.next_page_link = if self.kind.is_root() {
            None
        } else {
            body.get(NEXT_PAGE_LINK_KEY)
                .and_then(Value::as_str)
                .filter(|link| !link.is_empty())
                .map(str::to_string)
        };

        Ok(body)
    }
}

fn unwrap_items(response: Value) -> Value {
    match response {
        Value::Object(mut map) if map.contains_key(ITEMS_KEY) => {
            map.remove(ITEMS_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn take_items(page: Value) -> Result<Vec<Value>, ModelError> {
    match unwrap_items_field(page) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ModelError::UnexpectedShape {
            operation: "all_items",
            expected: "an Items array",
        }),
    }
}

fn unwrap_items_field(page: Value) -> Option<Value> {
    match page {
        Value::Object(mut map) => map.remove(ITEMS_KEY),
        _ => None,
    }
}

const fn first_shape_error() -> ModelError {
    ModelError::UnexpectedShape {
        operation: "first",
        expected: "an array or an object with an Items array",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MyobConfig;
    use crate::session::CompanyFileContext;
    use serde_json::json;

    fn direct_session() -> Session {
        let config = MyobConfig::builder()
            .server_url("http://localhost:8080/accountright")
            .build()
            .unwrap();
        Session::new(config)
    }

    #[test]
    fn test_root_url_is_base_url() {
        let session = direct_session();
        let model = Model::new(&session, ResourceKind::company_file());
        assert_eq!(
            model.build_url(None, None).unwrap(),
            "http://localhost:8080/accountright/"
        );
    }

    #[test]
    fn test_url_requires_company_file() {
        let session = direct_session();
        let model = session.model("Customer").unwrap();
        assert!(matches!(
            model.build_url(None, None),
            Err(ModelError::NoCompanyFileSelected)
        ));
    }

    #[test]
    fn test_url_uses_company_file_uri_and_id() {
        let session = direct_session();
        session.set_company_file(CompanyFileContext::new(
            "cf-1",
            "",
            Some("http://localhost:8080/accountright/cf-1/".to_string()),
        ));
        let model = session.model("Customer").unwrap();

        assert_eq!(
            model.build_url(None, None).unwrap(),
            "http://localhost:8080/accountright/cf-1/Contact/Customer"
        );
        assert_eq!(
            model
                .build_url(Some(&Record::with_id("uid-1")), None)
                .unwrap(),
            "http://localhost:8080/accountright/cf-1/Contact/Customer/uid-1"
        );
    }

    #[test]
    fn test_url_falls_back_to_base_and_id() {
        let session = direct_session();
        session.set_company_file(CompanyFileContext::new("cf-2", "tok", None));
        let model = session.model("Account").unwrap();

        let params = QueryParams::new().orderby("Name").top(5);
        assert_eq!(
            model.build_url(None, Some(&params)).unwrap(),
            "http://localhost:8080/accountright/cf-2/GeneralLedger/Account?$orderby=Name&$top=5"
        );
    }

    #[test]
    fn test_empty_params_add_no_question_mark() {
        let session = direct_session();
        let model = Model::new(&session, ResourceKind::company_file());
        assert!(!model
            .build_url(None, Some(&QueryParams::new()))
            .unwrap()
            .contains('?'));
    }

    #[test]
    fn test_new_model_has_no_next_page() {
        let session = direct_session();
        let model = session.model("Customer").unwrap();
        assert!(!model.has_next_page());
        assert!(model.next_page_link().is_none());
        assert_eq!(model.kind().name(), "Customer");
    }

    #[test]
    fn test_typecast_and_is_new_record_delegate_to_record() {
        let session = direct_session();
        let model = session.model("Invoice").unwrap();
        let record = Record::new().with("UID", "").with("Number", "1");

        assert!(model.is_new_record(&record));
        assert_eq!(model.typecast(&record), json!({"UID": "", "Number": "1"}));
    }

    #[tokio::test]
    async fn test_next_page_without_cursor_fails() {
        let session = direct_session();
        let mut model = session.model("Customer").unwrap();
        assert!(matches!(
            model.next_page(None).await,
            Err(ModelError::NoNextPage)
        ));
    }

    #[tokio::test]
    async fn test_destroy_requires_uid() {
        let session = direct_session();
        let model = session.model("Customer").unwrap();
        assert!(matches!(
            model.destroy(&Record::new()).await,
            Err(ModelError::MissingId)
        ));
    }

    #[test]
    fn test_unwrap_items() {
        assert_eq!(unwrap_items(json!({"Items": [1]})), json!([1]));
        assert_eq!(unwrap_items(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_items(json!({"Name": "x"})), json!({"Name": "x"}));
    }

    #[test]
    fn test_take_items_shapes() {
        assert_eq!(take_items(json!({"Items": [1, 2]})).unwrap(), vec![json!(1), json!(2)]);
        assert!(take_items(json!({"Count": 0})).unwrap().is_empty());
        assert!(matches!(
            take_items(json!({"Items": "nope"})),
            Err(ModelError::UnexpectedShape { operation: "all_items", .. })
        ));
    }
}
