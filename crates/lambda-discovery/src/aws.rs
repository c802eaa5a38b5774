//! AWS SDK collaborators
//!
//! `LambdaFunctionRegistry` reads functions from AWS Lambda and
//! `ApiGatewayInspector` reads REST APIs, resources and integrations from
//! API Gateway. Clients are built by the caller; both adapters follow the
//! SDK paginators to the last page.

use async_trait::async_trait;
use aws_sdk_apigateway::error::DisplayErrorContext as GatewayErrorContext;
use aws_sdk_lambda::error::DisplayErrorContext as LambdaErrorContext;
use tracing::{debug, warn};

use crate::{
    DiscoveryError, FunctionIdentity, FunctionRegistry, FunctionSummary, GatewayApi,
    GatewayInspector, HttpMethod, Integration, ResourcePath, Result,
};

fn registry_error<E: std::error::Error>(e: E) -> DiscoveryError {
    DiscoveryError::Registry(LambdaErrorContext(e).to_string())
}

fn gateway_error<E: std::error::Error>(e: E) -> DiscoveryError {
    DiscoveryError::Gateway(GatewayErrorContext(e).to_string())
}

/// Function registry backed by AWS Lambda
#[derive(Debug, Clone)]
pub struct LambdaFunctionRegistry {
    client: aws_sdk_lambda::Client,
}

impl LambdaFunctionRegistry {
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionRegistry for LambdaFunctionRegistry {
    async fn list_functions(&self) -> Result<Vec<FunctionSummary>> {
        let mut pages = self.client.list_functions().into_paginator().items().send();
        let mut functions = Vec::new();

        while let Some(function) = pages.try_next().await.map_err(registry_error)? {
            match (function.function_name(), function.function_arn()) {
                (Some(name), Some(arn)) => {
                    functions.push(FunctionSummary { name: name.to_string(), arn: arn.to_string() });
                },
                _ => warn!(?function, "Skipping function without name or ARN"),
            }
        }

        debug!(count = functions.len(), "Listed Lambda functions");
        Ok(functions)
    }

    async fn get_function(&self, name: &str) -> Result<FunctionIdentity> {
        let output = self.client.get_function().function_name(name).send().await.map_err(|e| {
            if e.as_service_error().is_some_and(|se| se.is_resource_not_found_exception()) {
                DiscoveryError::FunctionNotFound(name.to_string())
            } else {
                registry_error(e)
            }
        })?;

        let arn = output.configuration().and_then(|c| c.function_arn()).ok_or_else(|| {
            DiscoveryError::Registry(format!("Lambda returned no ARN for function {}", name))
        })?;

        Ok(FunctionIdentity::new(name, arn))
    }
}

/// Gateway inspector backed by API Gateway REST APIs
#[derive(Debug, Clone)]
pub struct ApiGatewayInspector {
    client: aws_sdk_apigateway::Client,
}

impl ApiGatewayInspector {
    pub fn new(client: aws_sdk_apigateway::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayInspector for ApiGatewayInspector {
    async fn list_apis(&self) -> Result<Vec<GatewayApi>> {
        let mut pages = self.client.get_rest_apis().into_paginator().items().send();
        let mut apis = Vec::new();

        while let Some(api) = pages.try_next().await.map_err(gateway_error)? {
            let Some(id) = api.id() else {
                continue;
            };

            let mut gateway_api = GatewayApi::new(id);
            if let Some(name) = api.name() {
                gateway_api = gateway_api.with_name(name);
            }
            apis.push(gateway_api);
        }

        debug!(count = apis.len(), "Listed REST APIs");
        Ok(apis)
    }

    async fn list_resource_paths(&self, api_id: &str) -> Result<Vec<ResourcePath>> {
        let mut pages =
            self.client.get_resources().rest_api_id(api_id).into_paginator().items().send();
        let mut resources = Vec::new();

        while let Some(resource) = pages.try_next().await.map_err(gateway_error)? {
            if let Some(id) = resource.id() {
                resources.push(ResourcePath::new(id, resource.path_part().unwrap_or_default()));
            }
        }

        Ok(resources)
    }

    async fn get_integration(
        &self,
        api_id: &str,
        resource_id: &str,
        method: HttpMethod,
    ) -> Result<Option<Integration>> {
        let result = self
            .client
            .get_integration()
            .rest_api_id(api_id)
            .resource_id(resource_id)
            .http_method(method.as_str())
            .send()
            .await;

        match result {
            Ok(output) => Ok(Some(Integration::new(output.uri().unwrap_or_default()))),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found_exception()) => Ok(None),
            Err(e) => Err(gateway_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_apigateway::{
        operation::{
            get_integration::{GetIntegrationError, GetIntegrationOutput},
            get_resources::GetResourcesOutput,
            get_rest_apis::GetRestApisOutput,
        },
        types::{
            Resource, RestApi,
            error::{NotFoundException, TooManyRequestsException},
        },
    };
    use aws_sdk_lambda::{
        operation::{
            get_function::{GetFunctionError, GetFunctionOutput},
            list_functions::ListFunctionsOutput,
        },
        types::{FunctionConfiguration, error::ResourceNotFoundException},
    };
    use aws_smithy_mocks::{RuleMode, mock, mock_client};

    use super::*;

    fn function(name: &str, arn: &str) -> FunctionConfiguration {
        FunctionConfiguration::builder().function_name(name).function_arn(arn).build()
    }

    #[tokio::test]
    async fn test_get_function_returns_identity() {
        let rule = mock!(aws_sdk_lambda::Client::get_function)
            .match_requests(|req| req.function_name() == Some("uppercase"))
            .then_output(|| {
                GetFunctionOutput::builder()
                    .configuration(function("uppercase", "arn:fn:uppercase"))
                    .build()
            });
        let registry = LambdaFunctionRegistry::new(mock_client!(aws_sdk_lambda, [&rule]));

        let identity = registry.get_function("uppercase").await.unwrap();

        assert_eq!(identity, FunctionIdentity::new("uppercase", "arn:fn:uppercase"));
    }

    #[tokio::test]
    async fn test_get_function_resource_not_found() {
        let rule = mock!(aws_sdk_lambda::Client::get_function).then_error(|| {
            GetFunctionError::ResourceNotFoundException(ResourceNotFoundException::builder().build())
        });
        let registry = LambdaFunctionRegistry::new(mock_client!(aws_sdk_lambda, [&rule]));

        let result = registry.get_function("missing").await;

        assert_eq!(result, Err(DiscoveryError::FunctionNotFound("missing".to_string())));
    }

    #[tokio::test]
    async fn test_get_function_without_arn() {
        let rule = mock!(aws_sdk_lambda::Client::get_function)
            .then_output(|| GetFunctionOutput::builder().build());
        let registry = LambdaFunctionRegistry::new(mock_client!(aws_sdk_lambda, [&rule]));

        let result = registry.get_function("uppercase").await;

        assert!(matches!(result, Err(DiscoveryError::Registry(_))));
    }

    #[tokio::test]
    async fn test_list_functions_follows_markers() {
        let first = mock!(aws_sdk_lambda::Client::list_functions)
            .match_requests(|req| req.marker().is_none())
            .then_output(|| {
                ListFunctionsOutput::builder()
                    .functions(function("uppercase", "arn:fn:uppercase"))
                    .functions(FunctionConfiguration::builder().function_name("broken").build())
                    .next_marker("page2")
                    .build()
            });
        let second = mock!(aws_sdk_lambda::Client::list_functions)
            .match_requests(|req| req.marker() == Some("page2"))
            .then_output(|| {
                ListFunctionsOutput::builder()
                    .functions(function("lowercase", "arn:fn:lowercase"))
                    .build()
            });
        let registry = LambdaFunctionRegistry::new(mock_client!(
            aws_sdk_lambda,
            RuleMode::MatchAny,
            [&first, &second]
        ));

        let functions = registry.list_functions().await.unwrap();

        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["uppercase", "lowercase"]);
    }

    #[tokio::test]
    async fn test_list_apis_follows_positions() {
        let first = mock!(aws_sdk_apigateway::Client::get_rest_apis)
            .match_requests(|req| req.position().is_none())
            .then_output(|| {
                GetRestApisOutput::builder()
                    .items(RestApi::builder().id("api1").name("public").build())
                    .position("page2")
                    .build()
            });
        let second = mock!(aws_sdk_apigateway::Client::get_rest_apis)
            .match_requests(|req| req.position() == Some("page2"))
            .then_output(|| {
                GetRestApisOutput::builder().items(RestApi::builder().id("api2").build()).build()
            });
        let inspector = ApiGatewayInspector::new(mock_client!(
            aws_sdk_apigateway,
            RuleMode::MatchAny,
            [&first, &second]
        ));

        let apis = inspector.list_apis().await.unwrap();

        assert_eq!(apis, vec![GatewayApi::new("api1").with_name("public"), GatewayApi::new("api2")]);
    }

    #[tokio::test]
    async fn test_list_resource_paths_follows_positions() {
        let first = mock!(aws_sdk_apigateway::Client::get_resources)
            .match_requests(|req| req.rest_api_id() == Some("api1") && req.position().is_none())
            .then_output(|| {
                GetResourcesOutput::builder()
                    .items(Resource::builder().id("r0").build())
                    .position("page2")
                    .build()
            });
        let second = mock!(aws_sdk_apigateway::Client::get_resources)
            .match_requests(|req| req.position() == Some("page2"))
            .then_output(|| {
                GetResourcesOutput::builder()
                    .items(Resource::builder().id("r1").path_part("uppercase").build())
                    .build()
            });
        let inspector = ApiGatewayInspector::new(mock_client!(
            aws_sdk_apigateway,
            RuleMode::MatchAny,
            [&first, &second]
        ));

        let resources = inspector.list_resource_paths("api1").await.unwrap();

        assert_eq!(
            resources,
            vec![ResourcePath::new("r0", ""), ResourcePath::new("r1", "uppercase")]
        );
    }

    #[tokio::test]
    async fn test_get_integration_bound() {
        let rule = mock!(aws_sdk_apigateway::Client::get_integration)
            .match_requests(|req| req.http_method() == Some("ANY"))
            .then_output(|| GetIntegrationOutput::builder().uri("arn:fn:uppercase").build());
        let inspector = ApiGatewayInspector::new(mock_client!(aws_sdk_apigateway, [&rule]));

        let integration = inspector.get_integration("api1", "r1", HttpMethod::Any).await.unwrap();

        assert_eq!(integration, Some(Integration::new("arn:fn:uppercase")));
    }

    #[tokio::test]
    async fn test_get_integration_not_found_is_absent() {
        let rule = mock!(aws_sdk_apigateway::Client::get_integration).then_error(|| {
            GetIntegrationError::NotFoundException(NotFoundException::builder().build())
        });
        let inspector = ApiGatewayInspector::new(mock_client!(aws_sdk_apigateway, [&rule]));

        let integration = inspector.get_integration("api1", "r1", HttpMethod::Get).await.unwrap();

        assert_eq!(integration, None);
    }

    #[tokio::test]
    async fn test_get_integration_other_errors_propagate() {
        let rule = mock!(aws_sdk_apigateway::Client::get_integration).then_error(|| {
            GetIntegrationError::TooManyRequestsException(
                TooManyRequestsException::builder().build(),
            )
        });
        let inspector = ApiGatewayInspector::new(mock_client!(aws_sdk_apigateway, [&rule]));

        let result = inspector.get_integration("api1", "r1", HttpMethod::Get).await;

        assert!(matches!(result, Err(DiscoveryError::Gateway(_))));
    }
}
