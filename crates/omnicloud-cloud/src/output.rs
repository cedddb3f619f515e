//! Deferred resource outputs
//!
//! An [`Output`] is a value that only becomes known once the provisioning
//! engine has registered some resource: a CloudFront domain, a zone's name
//! servers. Builders chain outputs into the arguments of later resources
//! instead of waiting for them, and [`Stack::finish`](crate::Stack::finish)
//! drives the whole graph to completion.
//!
//! Outputs are lazy and shared: nothing runs until the first `resolve`, and
//! every clone observes the same result.

use crate::error::{CloudError, Result};
use futures_util::future::{self, BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;

/// A shared, lazily resolved `Result<T>`
pub struct Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Shared<BoxFuture<'static, Result<T>>>,
}

impl<T> Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    /// An output whose value is already known
    pub fn known(value: T) -> Self {
        Self::new(future::ready(Ok(value)))
    }

    /// An output that resolves to `error`
    pub fn failed(error: CloudError) -> Self {
        Self::new(future::ready(Err(error)))
    }

    /// Wait for the value
    pub async fn resolve(&self) -> Result<T> {
        self.inner.clone().await
    }

    /// The result, if something has already driven this output to completion
    pub fn peek(&self) -> Option<&Result<T>> {
        self.inner.peek()
    }

    pub fn is_resolved(&self) -> bool {
        self.peek().is_some()
    }

    /// Transform the value once it is known
    pub fn apply<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let inner = self.inner.clone();
        Output::new(async move { inner.await.map(f) })
    }

    /// Transform the value with a fallible function
    pub fn try_apply<U, E, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        E: Into<CloudError>,
        F: FnOnce(T) -> std::result::Result<U, E> + Send + 'static,
    {
        let inner = self.inner.clone();
        Output::new(async move { f(inner.await?).map_err(Into::into) })
    }

    /// Combine with another output; fails if either fails
    pub fn zip<U>(&self, other: &Output<U>) -> Output<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let left = self.inner.clone();
        let right = other.inner.clone();
        Output::new(future::try_join(left, right))
    }

    /// Collect several outputs, preserving order
    pub fn all<I>(outputs: I) -> Output<Vec<T>>
    where
        I: IntoIterator<Item = Output<T>>,
    {
        let inners: Vec<_> = outputs.into_iter().map(|output| output.inner).collect();
        Output::new(future::try_join_all(inners))
    }
}

impl<T> Clone for Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Output<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(Ok(value)) => f.debug_tuple("Output").field(value).finish(),
            Some(Err(err)) => write!(f, "Output(<error: {err}>)"),
            None => f.write_str("Output(<pending>)"),
        }
    }
}

impl From<String> for Output<String> {
    fn from(value: String) -> Self {
        Output::known(value)
    }
}

impl From<&str> for Output<String> {
    fn from(value: &str) -> Self {
        Output::known(value.to_string())
    }
}

impl From<serde_json::Value> for Output<serde_json::Value> {
    fn from(value: serde_json::Value) -> Self {
        Output::known(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_known_and_apply() {
        let domain = Output::known("d123.cloudfront.net".to_string());
        let url = domain.apply(|d| format!("https://{d}"));

        assert_eq!(url.resolve().await.unwrap(), "https://d123.cloudfront.net");
        assert!(url.is_resolved());
    }

    #[tokio::test]
    async fn test_lazy_and_shared() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let output = Output::new(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(42u32)
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(output.peek().is_none());

        let copy = output.clone();
        assert_eq!(output.resolve().await.unwrap(), 42);
        assert_eq!(copy.resolve().await.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_try_apply_propagates_naming_error() {
        let target = Output::known(String::new());
        let rrdata = target.try_apply(|t| omnicloud_naming::cname_rrdata(&t));

        assert!(matches!(
            rrdata.resolve().await,
            Err(CloudError::Naming(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_output_poisons_dependents() {
        let failed: Output<String> = Output::failed(CloudError::ProvisioningFailed("boom".into()));
        let dependent = failed.apply(|s| s.len());

        assert_eq!(
            dependent.resolve().await,
            Err(CloudError::ProvisioningFailed("boom".into()))
        );
    }

    #[tokio::test]
    async fn test_zip_and_all() {
        let a = Output::from("a");
        let b = Output::known(2u32);
        assert_eq!(a.zip(&b).resolve().await.unwrap(), ("a".to_string(), 2));

        let all = Output::all(vec![Output::from("x"), Output::from("y")]);
        assert_eq!(all.resolve().await.unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_debug_pending() {
        let output = Output::from("later");
        assert_eq!(format!("{output:?}"), "Output(<pending>)");

        tokio_test::block_on(output.resolve()).unwrap();
        assert_eq!(format!("{output:?}"), "Output(\"later\")");
    }
}
