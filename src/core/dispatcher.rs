use crate::adapters::http::ReqwestTransport;
use crate::config::ConnectorSettings;
use crate::core::resolver::RequestResolver;
use crate::domain::model::{OperationRequest, ResultRecord};
use crate::domain::ports::{CredentialProvider, HttpTransport};
use crate::utils::error::{ConnectorError, Result};

/// Sends one request per input record, in order, and collects the results.
pub struct Dispatcher<T: HttpTransport> {
    resolver: RequestResolver,
    transport: T,
}

impl<T: HttpTransport> Dispatcher<T> {
    pub fn new(resolver: RequestResolver, transport: T) -> Self {
        Self {
            resolver,
            transport,
        }
    }

    pub async fn dispatch(
        &self,
        records: &[OperationRequest],
        continue_on_fail: bool,
    ) -> Result<Vec<ResultRecord>> {
        let mut results = Vec::with_capacity(records.len());
        self.dispatch_into(records, continue_on_fail, &mut results)
            .await?;
        Ok(results)
    }

    /// Like [`Dispatcher::dispatch`], but appends to `results` so records
    /// processed before an abort remain available to the caller.
    pub async fn dispatch_into(
        &self,
        records: &[OperationRequest],
        continue_on_fail: bool,
        results: &mut Vec<ResultRecord>,
    ) -> Result<()> {
        tracing::info!(
            "Dispatching {} record(s) to {}",
            records.len(),
            self.resolver.base_url()
        );

        for (index, record) in records.iter().enumerate() {
            match self.process(record).await {
                Ok(json) => {
                    tracing::debug!("Record {} ({}) succeeded", index, record.operation);
                    results.push(ResultRecord::success(json));
                }
                Err(e) if continue_on_fail => {
                    tracing::warn!(
                        "Record {} ({}) failed, continuing: {}",
                        index,
                        record.operation,
                        e
                    );
                    results.push(ResultRecord::failure(&e));
                }
                Err(e) => {
                    tracing::error!("Record {} ({}) failed: {}", index, record.operation, e);
                    return Err(ConnectorError::RecordFailed {
                        index,
                        operation: record.operation.clone(),
                        source: Box::new(e),
                    });
                }
            }
        }

        let failed = results.iter().filter(|r| r.is_error()).count();
        tracing::info!(
            "Dispatch finished: {} succeeded, {} failed",
            results.len() - failed,
            failed
        );
        Ok(())
    }

    async fn process(&self, record: &OperationRequest) -> Result<serde_json::Value> {
        let call = self.resolver.resolve(record)?;
        tracing::debug!("{} {}", call.method.as_str(), call.url);
        self.transport.execute(&call).await
    }
}

impl Dispatcher<ReqwestTransport> {
    pub fn from_settings(settings: &ConnectorSettings) -> Result<Self> {
        let mut resolver = RequestResolver::new(settings.credentials()?);
        if let Some(base_url) = &settings.base_url {
            resolver = resolver.with_base_url(base_url.as_str());
        }
        let transport = ReqwestTransport::with_timeout(settings.timeout)?;
        Ok(Self::new(resolver, transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credentials::Credentials;
    use crate::domain::model::{Payload, ResolvedCall};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Records every call and fails for venues listed in `failing`.
    #[derive(Clone, Default)]
    struct RecordingTransport {
        calls: Arc<Mutex<Vec<ResolvedCall>>>,
        failing: Vec<String>,
    }

    impl RecordingTransport {
        fn failing_on(venues: &[&str]) -> Self {
            Self {
                calls: Arc::default(),
                failing: venues.iter().map(|v| v.to_string()).collect(),
            }
        }

        fn calls(&self) -> Vec<ResolvedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn execute(&self, call: &ResolvedCall) -> Result<Value> {
            self.calls.lock().unwrap().push(call.clone());
            if self.failing.iter().any(|v| call.url.contains(&format!("/venues/{}/", v))) {
                return Err(ConnectorError::HttpStatusError {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(json!({ "url": call.url }))
        }
    }

    fn dispatcher(transport: RecordingTransport) -> Dispatcher<RecordingTransport> {
        let creds = Credentials::new("merchant", "secret").with_api_key("key");
        Dispatcher::new(RequestResolver::new(creds), transport)
    }

    fn menu(venue: &str) -> OperationRequest {
        OperationRequest::new("getMenu", venue, Payload::default())
    }

    #[test]
    fn test_results_preserve_input_order() {
        let transport = RecordingTransport::default();
        let dispatcher = dispatcher(transport.clone());
        let records = vec![menu("a"), menu("b"), menu("c")];

        let results = tokio_test::block_on(dispatcher.dispatch(&records, false)).unwrap();

        assert_eq!(results.len(), 3);
        for (result, venue) in results.iter().zip(["a", "b", "c"]) {
            assert!(result.json["url"].as_str().unwrap().contains(&format!("/venues/{}/", venue)));
        }
        assert_eq!(transport.calls().len(), 3);
    }

    #[test]
    fn test_abort_stops_at_first_failure() {
        let transport = RecordingTransport::failing_on(&["b"]);
        let dispatcher = dispatcher(transport.clone());
        let records = vec![menu("a"), menu("b"), menu("c")];

        let mut results = Vec::new();
        let err = tokio_test::block_on(dispatcher.dispatch_into(&records, false, &mut results))
            .unwrap_err();

        assert!(matches!(err, ConnectorError::RecordFailed { index: 1, .. }));
        assert_eq!(results.len(), 1);
        // 第三筆不應該送出
        assert_eq!(transport.calls().len(), 2);
    }

    #[test]
    fn test_continue_on_fail_attempts_every_record() {
        let transport = RecordingTransport::failing_on(&["b"]);
        let dispatcher = dispatcher(transport.clone());
        let records = vec![
            menu("a"),
            menu("b"),
            OperationRequest::new("unknownOp", "c", Payload::default()),
            menu("d"),
        ];

        let results = tokio_test::block_on(dispatcher.dispatch(&records, true)).unwrap();

        assert_eq!(results.len(), 4);
        assert!(!results[0].is_error());
        assert!(results[1].is_error());
        assert!(results[1].json["error"].as_str().unwrap().contains("500"));
        assert!(results[2].is_error());
        assert!(results[2].json["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported operation"));
        assert!(!results[3].is_error());
        // 解析失敗的紀錄不會發出請求
        assert_eq!(transport.calls().len(), 3);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let transport = RecordingTransport::default();
        let results = tokio_test::block_on(dispatcher(transport.clone()).dispatch(&[], false)).unwrap();
        assert!(results.is_empty());
        assert!(transport.calls().is_empty());
    }
}
