mod dispatcher;
mod payload;
mod request;

pub use dispatcher::RequestDispatcher;
pub use payload::Payload;
pub use request::ApiRequest;
