//! Live availability feed on `/ws`.
//!
//! Every admitted or canceled booking is broadcast to all connected clients
//! with the slot's remaining seats. Clients can also ask for the snapshot of
//! one slot with a `get_availability` action; that answer goes to the asking
//! client only.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{json, to_string, Value};
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    Mutex,
};
use tracing::{debug, warn};

use crate::{
    booking::BookingService,
    models::booking_model::{Booking, Session},
    state::AppState,
    utils::serialize_object_id_hex,
};

pub const BOOKING_ADMITTED: &str = "booking_admitted";
pub const BOOKING_CANCELED: &str = "booking_canceled";
const GET_AVAILABILITY: &str = "get_availability";

struct SharedState {
    clients: Vec<UnboundedSender<Message>>,
}

impl SharedState {
    fn new() -> Self {
        SharedState {
            clients: Vec::new(),
        }
    }

    /// Sends to every client and drops the ones whose socket is gone.
    fn broadcast(&mut self, message_text: &str) {
        self.clients
            .retain(|client| client.send(Message::Text(message_text.to_string())).is_ok());
    }
}

fn envelope(action_type: &str, status: &str, data: Value) -> String {
    let message = json!({
        "action_type": action_type,
        "status": status,
        "data": data
    });
    to_string(&message).unwrap_or_else(|_| "{}".to_string())
}

/// Payload of the broadcast events.
#[derive(Debug, Serialize)]
pub struct SlotUpdate {
    #[serde(serialize_with = "serialize_object_id_hex")]
    pub hall_id: ObjectId,
    pub session: Session,
    pub date: DateTime<Utc>,
    pub remaining: u64,
}

#[derive(Clone)]
pub struct AvailabilityFeed {
    state: Arc<Mutex<SharedState>>,
}

impl Default for AvailabilityFeed {
    fn default() -> Self {
        AvailabilityFeed {
            state: Arc::new(Mutex::new(SharedState::new())),
        }
    }
}

impl AvailabilityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client and returns the receiving end of its queue.
    pub async fn subscribe(&self) -> (UnboundedSender<Message>, UnboundedReceiver<Message>) {
        let (tx, rx) = unbounded_channel::<Message>();
        self.state.lock().await.clients.push(tx.clone());
        (tx, rx)
    }

    pub async fn client_count(&self) -> usize {
        let mut state = self.state.lock().await;
        state.clients.retain(|client| !client.is_closed());
        state.clients.len()
    }

    pub async fn broadcast(&self, action_type: &str, data: Value) {
        let message_text = envelope(action_type, "success", data);
        self.state.lock().await.broadcast(&message_text);
    }

    /// Broadcasts the slot of `booking` with its current remaining seats.
    /// Failing to compute the snapshot never fails the booking itself.
    pub async fn announce(&self, action_type: &str, booking: &Booking, bookings: &BookingService) {
        let availability = match bookings
            .availability(booking.hall_id, booking.session, booking.date)
            .await
        {
            Ok(availability) => availability,
            Err(e) => {
                warn!("Failed to compute availability for feed: {}", e);
                return;
            }
        };

        let update = SlotUpdate {
            hall_id: booking.hall_id,
            session: booking.session,
            date: booking.date,
            remaining: availability.remaining,
        };
        match serde_json::to_value(&update) {
            Ok(data) => self.broadcast(action_type, data).await,
            Err(e) => warn!("Failed to serialize slot update: {}", e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedRequest {
    action: String,
    hall_id: Option<String>,
    session: Option<Session>,
    date: Option<DateTime<Utc>>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = state.feed.subscribe().await;
    let clients = state.feed.client_count().await;
    debug!(clients, "Feed client connected");

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = sender.send(message).await {
                debug!("Failed to send message: {}", e);
                break;
            }
        }
    });

    while let Some(Ok(Message::Text(text))) = receiver.next().await {
        let reply = answer(&state, &text).await;
        if tx.send(Message::Text(reply)).is_err() {
            break;
        }
    }

    // Dropping the receiver marks this client closed for the next broadcast.
    send_task.abort();
}

async fn answer(state: &AppState, text: &str) -> String {
    let request = match serde_json::from_str::<FeedRequest>(text) {
        Ok(request) => request,
        Err(_) => {
            return envelope("error", "error", json!({"error": "Failed to parse request"}));
        }
    };

    if request.action != GET_AVAILABILITY {
        return envelope(
            &request.action,
            "error",
            json!({"error": "Unsupported action"}),
        );
    }

    let (Some(hall_id), Some(session), Some(date)) = (
        request
            .hall_id
            .as_deref()
            .and_then(|id| ObjectId::parse_str(id).ok()),
        request.session,
        request.date,
    ) else {
        return envelope(
            GET_AVAILABILITY,
            "error",
            json!({"error": "hall_id, session and date are required"}),
        );
    };

    match state.bookings.availability(hall_id, session, date).await {
        Ok(availability) => envelope(GET_AVAILABILITY, "success", json!(availability)),
        Err(e) => envelope(GET_AVAILABILITY, "error", json!({"error": e.to_string()})),
    }
}
