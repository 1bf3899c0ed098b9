mod responses;

pub use responses::{build_response_object, ResponseBuilder, ResponseBuilderOptions};
