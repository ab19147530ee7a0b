use axum::{
	Json, Router,
	extract::{
		OriginalUri, Path, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{StatusCode, Uri, header},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use uuid::Uuid;

use noteful_service::{
	Error as ServiceError, FolderView, NameRequest, NoteCreateRequest, NoteQuery,
	NoteUpdateRequest, NoteView, TagView,
};

use crate::state::AppState;

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/folders", get(list_folders).post(create_folder))
		.route("/api/folders/{id}", get(get_folder).put(update_folder).delete(delete_folder))
		.route("/api/tags", get(list_tags).post(create_tag))
		.route("/api/tags/{id}", get(get_tag).put(update_tag).delete(delete_tag))
		.route("/api/notes", get(list_notes).post(create_note))
		.route("/api/notes/{id}", get(get_note).put(update_note).delete(delete_note))
		.fallback(not_found)
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn not_found(State(state): State<AppState>) -> ApiError {
	state.fail(ServiceError::NotFound { message: "Not Found".to_string() })
}

async fn list_folders(State(state): State<AppState>) -> Result<Json<Vec<FolderView>>, ApiError> {
	let folders = state.service.folders.list().await.map_err(|err| state.fail(err))?;

	Ok(Json(folders))
}

async fn get_folder(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<FolderView>, ApiError> {
	let folder = state.service.folders.get(&id).await.map_err(|err| state.fail(err))?;

	Ok(Json(folder))
}

async fn create_folder(
	State(state): State<AppState>,
	OriginalUri(uri): OriginalUri,
	payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
	let Json(req) = payload.map_err(|err| state.fail(err))?;
	let folder = state.service.folders.create(req).await.map_err(|err| state.fail(err))?;

	Ok(created(&uri, folder.id, folder))
}

async fn update_folder(
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<FolderView>, ApiError> {
	let Json(req) = payload.map_err(|err| state.fail(err))?;
	let folder = state.service.folders.update(&id, req).await.map_err(|err| state.fail(err))?;

	Ok(Json(folder))
}

async fn delete_folder(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.service.folders.delete(&id).await.map_err(|err| state.fail(err))?;

	Ok(StatusCode::NO_CONTENT)
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagView>>, ApiError> {
	let tags = state.service.tags.list().await.map_err(|err| state.fail(err))?;

	Ok(Json(tags))
}

async fn get_tag(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<TagView>, ApiError> {
	let tag = state.service.tags.get(&id).await.map_err(|err| state.fail(err))?;

	Ok(Json(tag))
}

async fn create_tag(
	State(state): State<AppState>,
	OriginalUri(uri): OriginalUri,
	payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
	let Json(req) = payload.map_err(|err| state.fail(err))?;
	let tag = state.service.tags.create(req).await.map_err(|err| state.fail(err))?;

	Ok(created(&uri, tag.id, tag))
}

async fn update_tag(
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<TagView>, ApiError> {
	let Json(req) = payload.map_err(|err| state.fail(err))?;
	let tag = state.service.tags.update(&id, req).await.map_err(|err| state.fail(err))?;

	Ok(Json(tag))
}

async fn delete_tag(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.service.tags.delete(&id).await.map_err(|err| state.fail(err))?;

	Ok(StatusCode::NO_CONTENT)
}

async fn list_notes(
	State(state): State<AppState>,
	query: Result<Query<NoteQuery>, QueryRejection>,
) -> Result<Json<Vec<NoteView>>, ApiError> {
	let Query(query) = query.map_err(|err| state.fail(err))?;
	let notes = state.service.notes.list(query).await.map_err(|err| state.fail(err))?;

	Ok(Json(notes))
}

async fn get_note(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<NoteView>, ApiError> {
	let note = state.service.notes.get(&id).await.map_err(|err| state.fail(err))?;

	Ok(Json(note))
}

async fn create_note(
	State(state): State<AppState>,
	OriginalUri(uri): OriginalUri,
	payload: Result<Json<NoteCreateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
	let Json(req) = payload.map_err(|err| state.fail(err))?;
	let note = state.service.notes.create(req).await.map_err(|err| state.fail(err))?;

	Ok(created(&uri, note.id, note))
}

async fn update_note(
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<NoteUpdateRequest>, JsonRejection>,
) -> Result<Json<NoteView>, ApiError> {
	let Json(req) = payload.map_err(|err| state.fail(err))?;
	let note = state.service.notes.update(&id, req).await.map_err(|err| state.fail(err))?;

	Ok(Json(note))
}

async fn delete_note(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.service.notes.delete(&id).await.map_err(|err| state.fail(err))?;

	Ok(StatusCode::NO_CONTENT)
}

/// 201 with a `Location` of the request path plus the new id.
fn created<T>(uri: &Uri, id: Uuid, body: T) -> Response
where
	T: Serialize,
{
	let location = format!("{}/{id}", uri.path().trim_end_matches('/'));

	(StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	message: String,
	error: ErrorDetail,
}

#[derive(Debug, Default, Serialize)]
struct ErrorDetail {
	#[serde(skip_serializing_if = "Option::is_none")]
	name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	name: String,
	message: String,
	expose: bool,
}
impl ApiError {
	fn new(status: StatusCode, name: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, name: name.into(), message: message.into(), expose: false }
	}

	/// Controls whether the error name and internal message reach the client.
	pub(crate) fn exposed(mut self, expose: bool) -> Self {
		self.expose = expose;

		self
	}
}

pub(crate) fn json_error(status: StatusCode, name: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, name, message)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let status = match &err {
			ServiceError::Validation { .. }
			| ServiceError::InvalidIdentifier { .. }
			| ServiceError::InvalidReference { .. }
			| ServiceError::DuplicateName { .. } => StatusCode::BAD_REQUEST,
			ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
			ServiceError::Storage { .. } => {
				tracing::error!(error = %err, "Request failed in the store.");

				StatusCode::INTERNAL_SERVER_ERROR
			},
		};

		json_error(status, err.name(), err.to_string())
	}
}

/// Body read failures, such as exceeding the body limit, keep axum's status. Anything else about
/// the body is a 400.
impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		let status = match &err {
			JsonRejection::BytesRejection(_) => err.status(),
			_ => StatusCode::BAD_REQUEST,
		};

		json_error(status, "JsonRejection", err.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(err: QueryRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "QueryRejection", err.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let message = if self.status.is_server_error() && !self.expose {
			INTERNAL_ERROR_MESSAGE.to_string()
		} else {
			self.message.clone()
		};
		let error = if self.expose {
			ErrorDetail { name: Some(self.name), message: Some(self.message) }
		} else {
			ErrorDetail::default()
		};

		(self.status, Json(ErrorBody { message, error })).into_response()
	}
}
