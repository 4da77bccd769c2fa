use may_minihttp::{HttpService, Request, Response};
use std::io;
use tracing::warn;

use super::request::parse_request;
use super::response::{write_plain_error, write_response};
use crate::engine::Engine;

/// `may_minihttp` service that runs every request through an [`Engine`]
#[derive(Clone)]
pub struct EngineService {
    engine: Engine,
}

impl EngineService {
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl HttpService for EngineService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let request = match parse_request(req) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected request with invalid method");
                write_plain_error(res, 400, "Bad Request\n");
                return Ok(());
            }
        };
        let response = self.engine.handle(request);
        write_response(res, response);
        Ok(())
    }
}
