//! HTTP-level tests against a mock backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use showmaster_client::{ApiClient, ApiError};
use showmaster_core::providers::{AdminEndpoint, CatalogApi};
use showmaster_core::requests::{LoginRequest, TheaterRequest, TicketRequest};
use showmaster_core::types::{MovieId, ShowId, UserId};
use showmaster_core::ShowMasterError;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(server.uri());
    (server, client)
}

#[tokio::test]
async fn movies_decode() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/movie/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "movieName": "Dune", "genre": "ACTION", "language": "ENGLISH",
             "duration": 155, "rating": 8.1, "releaseDate": "2021-10-22"},
            {"id": 2, "movieName": "Coco", "genre": "ANIMATION", "language": "SPANISH",
             "duration": 105, "releaseDate": "2017-11-22"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let movies = client.list_movies().await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[1].movie_name, "Coco");
}

#[tokio::test]
async fn non_array_collections_are_empty() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/movie/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "none"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/show/movie/5"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(client.list_movies().await.unwrap().is_empty());
    assert!(client.list_shows(MovieId::new(5)).await.unwrap().is_empty());
}

#[tokio::test]
async fn shows_carry_requested_movie() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/show/movie/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"showId": 12, "date": "2025-01-02", "time": "18:30:00",
             "theater": {"id": 1, "name": "PVR", "address": "Main St"}}
        ])))
        .mount(&server)
        .await;

    let shows = CatalogApi::list_shows(&client, MovieId::new(5)).await.unwrap();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].id, ShowId::new(12));
    assert_eq!(shows[0].movie_id, Some(MovieId::new(5)));
}

#[tokio::test]
async fn login_returns_trimmed_token() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/user/getToken"))
        .and(body_json(json!({"username": "ann", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("abc.def.ghi\n"))
        .mount(&server)
        .await;

    let token = client
        .get_token(&LoginRequest {
            username: "ann".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
    assert_eq!(token, "abc.def.ghi");
}

#[tokio::test]
async fn profile_401_is_unauthorized() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.profile("abc").await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert!(ShowMasterError::from(err).is_authentication());
}

#[tokio::test]
async fn booking_sends_bearer_and_decodes_receipt() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/ticket/book"))
        .and(header("authorization", "Bearer abc"))
        .and(body_json(json!({"showId": 12, "userId": 3, "seatNos": ["A1", "A2"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amount": 400.0, "allottedSeats": "A1,A2", "movieName": "Dune"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = client
        .book(
            "abc",
            &TicketRequest {
                show_id: ShowId::new(12),
                user_id: UserId::new(3),
                seat_nos: vec!["A1".into(), "A2".into()],
            },
        )
        .await
        .unwrap();
    assert_eq!(ticket.seats, vec!["A1", "A2"]);
    assert_eq!(ticket.movie_name, "Dune");
    assert_eq!(ticket.amount, Some(400.0));
}

#[tokio::test]
async fn rejection_message_is_verbatim() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/ticket/book"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Requested seats are not available"))
        .mount(&server)
        .await;

    let err: ShowMasterError = client
        .book(
            "abc",
            &TicketRequest {
                show_id: ShowId::new(12),
                user_id: UserId::new(3),
                seat_nos: vec!["A1".into()],
            },
        )
        .await
        .unwrap_err()
        .into();
    assert_eq!(
        err,
        ShowMasterError::Remote {
            status: Some(400),
            message: "Requested seats are not available".into()
        }
    );
}

#[tokio::test]
async fn admin_create_sends_idempotency_key() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/theater/addNew"))
        .and(header("authorization", "Bearer admin"))
        .and(header_exists("idempotency-key"))
        .and(body_json(json!({"name": "PVR", "address": "Main St"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("Theater has been saved Successfully"))
        .expect(1)
        .mount(&server)
        .await;

    let message = client
        .create(
            "admin",
            AdminEndpoint::AddTheater,
            &TheaterRequest {
                name: "PVR".into(),
                address: "Main St".into(),
            },
            "key-1",
        )
        .await
        .unwrap();
    assert_eq!(message, "Theater has been saved Successfully");
}

#[tokio::test]
async fn user_tickets_use_history_shape() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/ticket/user/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"movieName": "Dune", "theaterName": "PVR", "address": "Main St",
             "date": "2025-01-02", "time": "18:30:00", "totalPrice": 400, "bookedSeats": "A1,A2"}
        ])))
        .mount(&server)
        .await;

    let tickets = client.user_tickets("abc", UserId::new(3)).await.unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].seat_list(), "A1, A2");
}

#[tokio::test]
async fn unreachable_backend_is_remote_without_status() {
    let client = ApiClient::new("http://127.0.0.1:1");
    let err: ShowMasterError = client.list_movies().await.unwrap_err().into();
    assert!(matches!(err, ShowMasterError::Remote { status: None, .. }));
}
