use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use super::hub::{NotificationHub, Push};
use crate::state::app_state::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = NotificationSession::new(app_state.hub.clone());
    ws::start(session, &req, stream)
}

/// A UI client. Receives every broadcast; ignores what it sends except
/// keepalives.
pub struct NotificationSession {
    token: Option<Uuid>,
    hub: Arc<NotificationHub>,
    last_heartbeat: Instant,
}

impl NotificationSession {
    fn new(hub: Arc<NotificationHub>) -> Self {
        Self {
            token: None,
            hub,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(token = ?actor.token, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for NotificationSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let token = self.hub.register(ctx.address().recipient::<Push>());
        self.token = Some(token);
        info!(%token, sessions = self.hub.session_count(), "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(token) = self.token.take() {
            self.hub.unregister(token);
            info!(%token, "[WS SESSION] stopped");
        }
    }
}

impl Handler<Push> for NotificationSession {
    type Result = ();

    fn handle(&mut self, msg: Push, ctx: &mut Self::Context) {
        ctx.text(&*msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for NotificationSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) | Ok(ws::Message::Text(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Binary(_)) => {
                warn!(token = ?self.token, "[WS SESSION] binary frame, closing");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Unsupported)));
                ctx.stop();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {}
            Err(err) => {
                warn!(token = ?self.token, error = %err, "[WS SESSION] protocol error");
                ctx.stop();
            }
        }
    }
}
