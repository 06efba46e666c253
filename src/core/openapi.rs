use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::{ApiResponse, HealthDto, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::get_me,
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::download_file,
        files_handlers::delete_file,
    ),
    components(
        schemas(
            // Shared
            Meta,
            HealthDto,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileSummaryDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileSummaryDto>,
            ApiResponse<Vec<files_dtos::FileSummaryDto>>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "files", description = "Personal file storage"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Cloud Drive API",
        version = "0.1.0",
        description = "API documentation for Cloud Drive",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
