// src/loggers/model.rs
use crate::config::VariantKind;
use crate::loggers::completion::{Completion, NotAttached, OnFailure, OnSuccess};
use crate::loggers::{to_field, BaseLogger, LeveledLog, LoggerVariant};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// Logger for the data-access layer.
///
/// Every helper is fire-and-forget: nothing is returned and nothing panics.
#[derive(Clone)]
pub struct ModelLogger {
    base: BaseLogger,
}

impl ModelLogger {
    /// Logs the outcome of a database query once `completion` settles.
    ///
    /// Success logs "Queried Database" at debug; failure goes through
    /// [`failed`](Self::failed). When the completion can't be attached the
    /// query is logged right away, followed by an error saying why: no
    /// awaitable was returned, or no runtime was there to drive it.
    pub fn query<P, C>(&self, query_name: &str, param: &P, completion: C)
    where
        P: Serialize + ?Sized,
        C: Completion,
    {
        let param = to_field(param);

        let on_success: OnSuccess = {
            let base = self.base.clone();
            let query = query_name.to_string();
            let param = param.clone();
            Box::new(move || base.debug(json!({ "query": query, "param": param }), "Queried Database"))
        };
        let on_failure: OnFailure<C::Error> = {
            let logger = self.clone();
            let query = query_name.to_string();
            let param = param.clone();
            Box::new(move |err: C::Error| logger.failed(&query, &param, err))
        };

        if let Err(reason) = completion.attach(on_success, on_failure) {
            let message = match reason {
                NotAttached::NotAwaitable => "Promise not returned for Query Call",
                NotAttached::NoRuntime => "No async runtime to await Query Call",
            };
            self.base.debug(json!({ "query": query_name, "param": param }), query_name);
            self.base.error(json!({ "queryName": query_name, "param": param }), message);
        }
    }

    pub fn failed<P, E>(&self, query: &str, param: &P, error: E)
    where
        P: Serialize + ?Sized,
        E: fmt::Display,
    {
        self.base.error(
            json!({ "query": query, "param": to_field(param), "error": error.to_string() }),
            "Failed Database Transaction",
        );
    }

    pub fn validating<D: Serialize + ?Sized>(&self, doc: &D) {
        self.document(doc, "Validating Document");
    }

    pub fn valid<D: Serialize + ?Sized>(&self, doc: &D) {
        self.document(doc, "Validated Document");
    }

    pub fn invalid<D, E>(&self, doc: &D, err: E)
    where
        D: Serialize + ?Sized,
        E: fmt::Display,
    {
        self.base.trace(
            json!({ "object": to_field(doc), "error": err.to_string() }),
            "Invalid Document",
        );
    }

    pub fn saving<D: Serialize + ?Sized>(&self, doc: &D) {
        self.document(doc, "Saving Data");
    }

    pub fn saved<D: Serialize + ?Sized>(&self, doc: &D) {
        self.document(doc, "Saved Successfully");
    }

    pub fn failed_save<D: Serialize + ?Sized>(&self, doc: &D) {
        self.document(doc, "Not Saved Successfully");
    }

    pub fn updated<D: Serialize + ?Sized>(&self, doc: &D) {
        self.document(doc, "Updated Successfully");
    }

    pub fn failed_update<D: Serialize + ?Sized>(&self, doc: &D) {
        self.document(doc, "Not Updated Successfully");
    }

    pub fn deleted<I: Serialize + ?Sized>(&self, id: &I) {
        self.base.trace(json!({ "id": to_field(id) }), "Deleted Successfully");
    }

    fn document<D: Serialize + ?Sized>(&self, doc: &D, message: &str) {
        let object: Value = to_field(doc);
        self.base.trace(json!({ "object": object }), message);
    }
}

impl LoggerVariant for ModelLogger {
    const KIND: VariantKind = VariantKind::Model;

    fn from_base(base: BaseLogger) -> Self {
        Self { base }
    }

    fn base(&self) -> &BaseLogger {
        &self.base
    }
}
