//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use landlord_transport::{Connection, Incoming, Transport, WebSocketConnection, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs =
        tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

    /// Binds a transport, connects one client to `path`, and returns both ends.
    async fn connected_pair(path: &str) -> (WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound address");

        let server = tokio::spawn(async move {
            let incoming = transport.accept().await.expect("should accept");
            incoming.upgrade().await.expect("should upgrade")
        });
        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}{path}"))
            .await
            .expect("client should connect");
        let conn = server.await.expect("accept task");
        (conn, client)
    }

    #[tokio::test]
    async fn test_send_and_receive_text() {
        let (conn, mut client) = connected_pair("/ws").await;
        assert!(conn.id().into_inner() > 0);

        conn.send(r#"{"category":"game","action":"broadcast"}"#)
            .await
            .expect("send should succeed");
        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(
            msg.into_text().unwrap().as_str(),
            r#"{"category":"game","action":"broadcast"}"#
        );

        client.send(Message::text("hello from client")).await.unwrap();
        let received = conn.recv().await.expect("recv").expect("data");
        assert_eq!(received, b"hello from client");

        client
            .send(Message::Binary(b"raw bytes".to_vec().into()))
            .await
            .unwrap();
        let received = conn.recv().await.expect("recv").expect("data");
        assert_eq!(received, b"raw bytes");

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_idle_stream_does_not_block_accept() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound address");

        // A peer that opens TCP and never sends the upgrade request.
        let _idle = tokio::net::TcpStream::connect(addr).await.unwrap();
        let stalled = tokio::time::timeout(Duration::from_secs(1), transport.accept())
            .await
            .expect("accept should not wait for the handshake")
            .expect("should accept");

        let client = tokio::spawn(async move {
            tokio_tungstenite::connect_async(format!("ws://{addr}/ws/lobby?name=bob")).await
        });
        let incoming = tokio::time::timeout(Duration::from_secs(3), transport.accept())
            .await
            .expect("second accept should not be blocked")
            .expect("should accept");
        let conn = incoming.upgrade().await.expect("should upgrade");
        assert_eq!(conn.target(), "/ws/lobby?name=bob");
        assert!(client.await.unwrap().is_ok());
        drop(stalled);
    }

    #[tokio::test]
    async fn test_target_captures_path_and_query() {
        let (conn, _client) = connected_pair("/ws/aB3xY9?name=ada").await;
        assert_eq!(conn.target(), "/ws/aB3xY9?name=ada");
    }

    #[tokio::test]
    async fn test_send_not_blocked_by_pending_recv() {
        let (conn, mut client) = connected_pair("/ws").await;
        let conn = Arc::new(conn);

        // Park a reader on the connection with nothing to read.
        let reader = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(1), conn.send("ping"))
            .await
            .expect("send must not wait for recv")
            .expect("send should succeed");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "ping");

        client.send(Message::Close(None)).await.unwrap();
        let result = reader.await.unwrap().expect("recv should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (conn, mut client) = connected_pair("/ws").await;
        client.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }
}
