use std::time::Instant;

use log::{debug, warn};
use serde::Serialize;

use crate::{consts::consts::PersonId, model::person::Person, options::ClientOptions};

use super::{decode_created_id, decode_people, GatewayError, GatewayResult, PersonApi};

#[derive(Serialize)]
struct DeleteRequest {
    id: PersonId,
}

/// Talks to the REST resource over HTTP
#[derive(Clone)]
pub struct HttpGateway {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(options: &ClientOptions) -> GatewayResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(GatewayError::from)?;

        Ok(Self {
            endpoint: options.endpoint.clone(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the request and returns the body of a 2xx response
    async fn send(&self, method: &str, request: reqwest::RequestBuilder) -> GatewayResult<String> {
        let start = Instant::now();
        debug!("[GATEWAY] Sending {} to {}", method, self.endpoint);

        let response = request.send().await.map_err(|e| {
            warn!("[GATEWAY] {} failed: {}", method, e);
            GatewayError::from(e)
        })?;

        let status = response.status();
        debug!(
            "[GATEWAY] Response received: status={} duration_ms={}",
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            warn!("[GATEWAY] {} rejected with status {}", method, status);
            return Err(GatewayError::Status(status.as_u16()));
        }

        response.text().await.map_err(GatewayError::from)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            GatewayError::Status(status.as_u16())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}

impl PersonApi for HttpGateway {
    #[tracing::instrument(skip(self))]
    async fn load(&self) -> GatewayResult<Vec<Person>> {
        let body = self.send("GET", self.http_client.get(&self.endpoint)).await?;

        decode_people(&body)
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, person: &Person) -> GatewayResult<PersonId> {
        let request = self.http_client.post(&self.endpoint).json(person);
        let body = self.send("POST", request).await?;

        decode_created_id(&body)
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, person: &Person) -> GatewayResult<String> {
        let request = self.http_client.put(&self.endpoint).json(person);

        self.send("PUT", request).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: PersonId) -> GatewayResult<()> {
        let request = self
            .http_client
            .delete(&self.endpoint)
            .json(&DeleteRequest { id });

        self.send("DELETE", request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    use super::*;

    /// Reads one HTTP/1.1 request, headers plus a `content-length` body
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let read = stream.read(&mut chunk).await.expect("should read the request");
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buffer);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buffer.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Serves a single canned response. The handle resolves to the raw request received.
    async fn serve_once(status: &'static str, body: &'static str) -> (HttpGateway, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind a free port");
        let address = listener.local_addr().expect("should have an address");

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("should accept");
            let request = read_request(&mut stream).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("should write the response");
            let _ = stream.shutdown().await;

            request
        });

        let options = ClientOptions::default()
            .set_endpoint(format!("http://{}/api/personas", address))
            .set_timeout(Duration::from_secs(5));
        let gateway = HttpGateway::new(&options).expect("client should build");

        (gateway, handle)
    }

    fn body_of(request: &str) -> &str {
        request
            .split_once("\r\n\r\n")
            .map(|(_, body)| body)
            .unwrap_or("")
    }

    fn declares_json(request: &str) -> bool {
        request
            .to_lowercase()
            .contains("content-type: application/json")
    }

    mod load {
        use super::*;

        #[test_log::test(tokio::test)]
        async fn decodes_array_body() {
            let (gateway, server) = serve_once(
                "200 OK",
                r#"[{"id":1,"nombre":"Ana","apellido":"Diaz","fechaNacimiento":19900101,"dni":123}]"#,
            )
            .await;

            let people = gateway.load().await.expect("should load");

            assert_eq!(
                people,
                vec![Person::citizen(Some(PersonId(1)), "Ana", "Diaz", "19900101", 123)]
            );

            let request = server.await.expect("server should finish");
            assert!(request.starts_with("GET /api/personas "), "{}", request);
        }

        #[tokio::test]
        async fn error_status_is_a_transport_error() {
            let (gateway, _server) = serve_once("500 Internal Server Error", "boom").await;

            let error = gateway.load().await.expect_err("should fail");

            assert_eq!(error, GatewayError::Status(500));
            assert!(error.is_transport());
        }

        #[tokio::test]
        async fn success_with_non_json_body_is_a_decode_error() {
            let (gateway, _server) = serve_once("200 OK", "<html>oops</html>").await;

            let error = gateway.load().await.expect_err("should fail");

            assert!(error.is_decode(), "{:?}", error);
        }
    }

    mod create {
        use super::*;

        #[tokio::test]
        async fn posts_json_without_id_and_reads_assigned_id() {
            let (gateway, server) = serve_once("201 Created", r#"{"id":7}"#).await;
            let person = Person::foreigner(None, "John", "Smith", "19851224", "Chile");

            let id = gateway.create(&person).await.expect("should create");

            assert_eq!(id, PersonId(7));

            let request = server.await.expect("server should finish");
            assert!(request.starts_with("POST /api/personas "), "{}", request);
            assert!(declares_json(&request), "{}", request);

            let body: serde_json::Value =
                serde_json::from_str(body_of(&request)).expect("body should be JSON");
            assert!(body.get("id").is_none());
            assert_eq!(body["paisOrigen"], "Chile");
        }

        #[tokio::test]
        async fn response_without_id_is_a_decode_error() {
            let (gateway, _server) = serve_once("200 OK", r#"{"ok":true}"#).await;

            let error = gateway
                .create(&Person::new_test_citizen(1))
                .await
                .expect_err("should fail");

            assert!(error.is_decode(), "{:?}", error);
        }
    }

    mod update {
        use super::*;

        #[tokio::test]
        async fn puts_full_record_and_returns_server_text() {
            let (gateway, server) = serve_once("200 OK", "Modificación exitosa").await;

            let message = gateway
                .update(&Person::new_test_citizen(5))
                .await
                .expect("should update");

            assert_eq!(message, "Modificación exitosa");

            let request = server.await.expect("server should finish");
            assert!(request.starts_with("PUT /api/personas "), "{}", request);
            assert!(declares_json(&request), "{}", request);

            let body: serde_json::Value =
                serde_json::from_str(body_of(&request)).expect("body should be JSON");
            assert_eq!(body["id"], 5);
            assert_eq!(body["dni"], 30_123_456);
        }

        #[tokio::test]
        async fn rejected_update_keeps_status() {
            let (gateway, _server) = serve_once("400 Bad Request", "invalid").await;

            let error = gateway
                .update(&Person::new_test_foreigner(5))
                .await
                .expect_err("should fail");

            assert_eq!(error, GatewayError::Status(400));
        }
    }

    mod delete {
        use super::*;

        #[tokio::test]
        async fn sends_only_the_id() {
            let (gateway, server) = serve_once("200 OK", "").await;

            gateway.delete(PersonId(3)).await.expect("should delete");

            let request = server.await.expect("server should finish");
            assert!(request.starts_with("DELETE /api/personas "), "{}", request);
            assert!(declares_json(&request), "{}", request);
            assert_eq!(body_of(&request), r#"{"id":3}"#);
        }

        #[tokio::test]
        async fn error_status_is_reported() {
            let (gateway, _server) = serve_once("500 Internal Server Error", "").await;

            assert_eq!(
                gateway.delete(PersonId(3)).await,
                Err(GatewayError::Status(500))
            );
        }
    }

    #[test]
    fn uses_configured_endpoint() {
        let options = ClientOptions::default().set_endpoint("http://127.0.0.1:9/personas");

        let gateway = HttpGateway::new(&options).expect("client should build");

        assert_eq!(gateway.endpoint(), "http://127.0.0.1:9/personas");
    }

    #[test]
    fn delete_body_only_carries_id() {
        let body = serde_json::to_string(&DeleteRequest { id: PersonId(3) }).unwrap();

        assert_eq!(body, r#"{"id":3}"#);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) is closed on any sane test host
        let options = ClientOptions::default()
            .set_endpoint("http://127.0.0.1:9/personas")
            .set_connect_timeout(Duration::from_millis(500))
            .set_timeout(Duration::from_secs(1));
        let gateway = HttpGateway::new(&options).expect("client should build");

        let error = gateway.load().await.expect_err("nothing listens there");

        assert!(error.is_transport(), "{:?}", error);
    }
}
