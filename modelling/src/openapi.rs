//! OpenAPI document for the modelling API, served at `/api-docs/openapi.json` and rendered
//! at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Session token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token from `POST /login`. Send it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```\n\n\
                            Deployments configured for cookie transport read the token from the session cookie instead.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::login,
        api::handlers::models::create_model,
        api::handlers::models::list_models,
        api::handlers::models::get_model,
        api::handlers::models::delete_model,
        api::handlers::parameters::create_parameter,
        api::handlers::parameters::list_parameters,
        api::handlers::parameters::delete_parameter,
        api::handlers::values::list_values,
        api::handlers::values::modify_values,
        api::handlers::translations::list_parameter_translations,
        api::handlers::translations::modify_parameter_translations,
        api::handlers::translations::list_value_translations,
        api::handlers::translations::modify_value_translations,
        api::handlers::constraints::list_constraints,
        api::handlers::constraints::create_constraint,
        api::handlers::constraints::delete_constraint,
    ),
    components(schemas(
        api::models::auth::LoginRequest,
        api::models::auth::TokenResponse,
        api::models::models::ModelCreate,
        api::models::models::ModelCreated,
        api::models::models::ModelResponse,
        api::models::models::ModelDetail,
        api::models::parameters::ParameterCreate,
        api::models::parameters::ParameterCreated,
        api::models::parameters::ParameterResponse,
        api::models::parameters::ValueResponse,
        api::models::parameters::ValueModification,
        api::models::parameters::ValueUpdate,
        api::models::parameters::ModificationResult,
        api::models::translations::TranslationResponse,
        api::models::translations::TranslationModification,
        api::models::translations::NewTranslation,
        api::models::translations::TranslationUpdate,
        api::models::translations::ValueTranslationResponse,
        api::models::translations::ValueTranslationModification,
        api::models::translations::NewValueTranslation,
        api::models::translations::ValueTranslationUpdate,
        api::models::constraints::ConstraintCreate,
        api::models::constraints::ConstraintResponse,
        crate::types::ValueType,
        crate::types::ConstraintType,
    )),
    tags(
        (name = "authentication", description = "Session tokens"),
        (name = "models", description = "Configurable models owned by the caller"),
        (name = "parameters", description = "Parameters of a model"),
        (name = "values", description = "Enumerated values of a parameter"),
        (name = "translations", description = "Per-language names of parameters and values"),
        (name = "constraints", description = "Relations between values of different parameters"),
    ),
    info(
        title = "Modelling API",
        description = "Multi-tenant catalog of configurable models, their parameters, values, translations and constraints.",
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_protected_paths_with_security() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/login"));
        assert!(doc.paths.paths.contains_key("/models/{model_id}/parameters/{parameter_id}/values"));
        assert!(doc.components.as_ref().unwrap().security_schemes.contains_key("BearerAuth"));
    }

    #[test]
    fn test_document_includes_modification_bodies() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;

        for name in ["ValueModification", "TranslationModification", "ValueTranslationModification"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
