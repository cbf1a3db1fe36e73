//! Method routing for positional-argument calls.
//!
//! Every parameter is validated into its typed form here, before the service
//! resolves a session or consults the gate.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::error::RpcError;
use crate::domain::methods::{self, get_method_info};
use crate::domain::options::{
    required_url, ListStatusesQuery, NewStatus, SaveFileOptions, SelectFileOptions,
    SelectResourceOptions, StatusPatch,
};
use crate::domain::types::CallerContext;
use crate::ports::inbound::{ApplicationApi, DialogApi, StatusesApi};

fn to_json<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

/// Routes method names onto the bridge's inbound ports
pub struct RpcDispatcher<S> {
    service: Arc<S>,
}

impl<S> Clone for RpcDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S> RpcDispatcher<S>
where
    S: DialogApi + ApplicationApi + StatusesApi,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Invoke `method` on behalf of `caller` with positional `params`
    pub async fn call(
        &self,
        caller: &CallerContext,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, RpcError> {
        let info = match get_method_info(method) {
            Some(info) => info,
            None => {
                warn!(method, origin = caller.origin(), "Unknown method");
                return Err(RpcError::method_not_found(method));
            }
        };
        debug!(method, kind = ?info.kind, origin = caller.origin(), "Dispatching");

        let result = if method.starts_with("statuses.") {
            self.route_statuses(caller, method, &params).await
        } else {
            self.route_root(caller, method, &params).await
        };

        if let Err(e) = &result {
            debug!(method, code = e.code, name = %e.name, "Call failed");
        }
        result
    }

    async fn route_root(
        &self,
        caller: &CallerContext,
        method: &str,
        params: &[Value],
    ) -> Result<Value, RpcError> {
        match method {
            methods::SELECT_FILE_DIALOG => {
                let opts = SelectFileOptions::from_value(params.first())?;
                to_json(self.service.select_file(caller, opts).await?)
            }
            methods::SAVE_FILE_DIALOG => {
                let opts = SaveFileOptions::from_value(params.first())?;
                to_json(self.service.save_file(caller, opts).await?)
            }
            methods::SELECT_RESOURCE_DIALOG => {
                let opts = SelectResourceOptions::from_value(params.first())?;
                to_json(self.service.select_resource(caller, opts).await?)
            }
            methods::GET_APPLICATION_STATE => {
                to_json(self.service.get_application_state(caller).await?)
            }
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    async fn route_statuses(
        &self,
        caller: &CallerContext,
        method: &str,
        params: &[Value],
    ) -> Result<Value, RpcError> {
        match method {
            methods::STATUSES_LIST => {
                let query = ListStatusesQuery::from_value(params.first())?;
                to_json(self.service.list(caller, query).await?)
            }
            methods::STATUSES_GET => {
                let url = required_url(params.first())?;
                to_json(self.service.get(caller, &url).await?)
            }
            methods::STATUSES_ADD => {
                let status = NewStatus::from_value(params.first())?;
                to_json(self.service.add(caller, status).await?)
            }
            methods::STATUSES_EDIT => {
                let url = required_url(params.first())?;
                let patch = StatusPatch::from_value(params.get(1))?;
                to_json(self.service.edit(caller, &url, patch).await?)
            }
            methods::STATUSES_REMOVE => {
                let url = required_url(params.first())?;
                self.service.remove(caller, &url).await?;
                Ok(Value::Null)
            }
            _ => Err(RpcError::method_not_found(method)),
        }
    }
}
