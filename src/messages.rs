//! Response keys and client-facing message strings shared by every handler.

pub const STATUS: &str = "status";
pub const MESSAGE: &str = "message";
pub const DATA: &str = "data";

pub const CREATED: &str = "created";
pub const UPDATED: &str = "updated";
pub const REMOVED: &str = "removed";

pub const ERROR_QUERY: &str = "error running the query";
pub const ERROR_CREATE: &str = "error creating the record";
pub const ERROR_UPDATE: &str = "error updating the record";
pub const ERROR_DELETE: &str = "error removing the record";

pub const ID_INVALID: &str = "the id is invalid";
pub const ID_NO_EXIST: &str = "the id does not exist";
pub const TOKEN_INVALID: &str = "the token is invalid";
pub const BODY_NOT_OBJECT: &str = "the request body must be a JSON object";

pub const NAME_FIELD_IS_REQUIRED: &str = "the name field is required";
pub const ACTIVE_FIELD_IS_REQUIRED: &str = "the active field is required";
pub const CITY_ID_FIELD_IS_REQUIRED: &str = "the city_id field is required";
pub const ZIP_CODE_FIELD_IS_REQUIRED: &str = "the zip_code field is required";

pub const NAME_IS_REQUIRED: &str = "the name is required";
pub const CITY_ID_IS_REQUIRED: &str = "the city id is required";
pub const ZIP_CODE_IS_REQUIRED: &str = "the zip code is required";

pub const NAME_ALREADY_EXIST: &str = "the name already exists";
pub const CITY_NO_EXIST: &str = "the city does not exist";

pub const NAME_TOO_LONG: &str = "the name must be at most 100 characters";
pub const ZIP_CODE_TOO_LONG: &str = "the zip code must be at most 100 characters";
