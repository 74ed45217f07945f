use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;

pub const API_KEY_HEADER: &str = "x-api-key";

const MISSING_KEY_MESSAGE: &str =
    "API key is required. Please provide it in the X-API-Key header.";
const INVALID_KEY_MESSAGE: &str = "Invalid API key.";

/// Shared-secret authentication. Membership in the configured key list is the
/// entire authorization model; requests are rejected before any handler runs.
pub struct ApiKeyAuth {
    keys: Arc<Vec<String>>,
}

impl ApiKeyAuth {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys: Arc::new(keys) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware { service, keys: self.keys.clone() }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: S,
    keys: Arc<Vec<String>>,
}

fn unauthorized<B>(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
    let response = HttpResponse::Unauthorized()
        .json(serde_json::json!({
            "error": "Unauthorized",
            "message": message,
        }))
        .map_into_right_body();
    let (request, _) = req.into_parts();
    ServiceResponse::new(request, response)
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        match provided {
            None => Box::pin(ready(Ok(unauthorized(req, MISSING_KEY_MESSAGE)))),
            Some(key) if !self.keys.contains(&key) => {
                Box::pin(ready(Ok(unauthorized(req, INVALID_KEY_MESSAGE))))
            }
            Some(_) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};
    use serde_json::Value;

    macro_rules! guarded_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(ApiKeyAuth::new(vec!["valid-key".into()]))
                    .route("/probe", web::get().to(|| async { HttpResponse::Ok().body("ok") })),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let app = guarded_app!();
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/probe").to_request()).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(
            body["message"],
            "API key is required. Please provide it in the X-API-Key header."
        );
    }

    #[actix_web::test]
    async fn unknown_key_is_unauthorized() {
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/probe")
            .insert_header((API_KEY_HEADER, "wrong-key"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid API key.");
    }

    #[actix_web::test]
    async fn configured_key_passes_through() {
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/probe")
            .insert_header((API_KEY_HEADER, "valid-key"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }
}
