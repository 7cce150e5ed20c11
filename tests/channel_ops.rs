//! Integration tests for channel operator actions and channel lifecycle.

mod common;

use common::{TestClient, TestServer};

async fn registered(server: &TestServer, nick: &str) -> TestClient {
    let mut client = TestClient::connect(server.address(), nick)
        .await
        .expect("Failed to connect");
    client.register().await.expect("Registration failed");
    client
}

#[tokio::test]
async fn test_kick_error_codes() {
    let server = TestServer::spawn().await.unwrap();
    let mut op = registered(&server, "op").await;
    let mut member = registered(&server, "member").await;
    let _outsider = registered(&server, "outsider").await;
    op.join("#room").await.unwrap();
    member.join("#room").await.unwrap();
    op.recv_until_command("JOIN").await.unwrap();

    op.send_raw("KICK #room outsider").await.unwrap();
    assert_eq!(
        op.recv().await.unwrap(),
        ":test.server 441 op outsider #room :They aren't on that channel"
    );

    op.send_raw("KICK #room ghost").await.unwrap();
    assert_eq!(
        op.recv().await.unwrap(),
        ":test.server 401 op ghost :No such nick/channel"
    );

    member.send_raw("KICK #room op").await.unwrap();
    assert_eq!(
        member.recv().await.unwrap(),
        ":test.server 482 member #room :You're not channel operator"
    );
}

#[tokio::test]
async fn test_kick_removes_member() {
    let server = TestServer::spawn().await.unwrap();
    let mut op = registered(&server, "op").await;
    let mut member = registered(&server, "member").await;
    op.join("#room").await.unwrap();
    member.join("#room").await.unwrap();
    op.recv_until_command("JOIN").await.unwrap();

    op.send_raw("KICK #room member :out").await.unwrap();
    let expected = ":op!op@localhost KICK #room member :out";
    assert_eq!(op.recv().await.unwrap(), expected);
    assert_eq!(member.recv().await.unwrap(), expected);

    member.send_raw("PRIVMSG #room :still here?").await.unwrap();
    assert_eq!(
        member.recv().await.unwrap(),
        ":test.server 404 member #room :Cannot send to channel"
    );
}

#[tokio::test]
async fn test_channel_destroyed_when_empty() {
    let server = TestServer::spawn().await.unwrap();
    let mut a = registered(&server, "a").await;
    let mut b = registered(&server, "b").await;
    a.join("#room").await.unwrap();
    a.send_raw("PART #room").await.unwrap();
    a.recv().await.unwrap();

    // Recreated from scratch: the new founder is operator
    let lines = b.join("#room").await.unwrap();
    assert_eq!(lines[2], ":test.server 353 b = #room :@b");

    // Operator status does not survive leaving
    a.join("#room").await.unwrap();
    a.send_raw("KICK #room b").await.unwrap();
    assert_eq!(
        a.recv().await.unwrap(),
        ":test.server 482 a #room :You're not channel operator"
    );
}

#[tokio::test]
async fn test_topic_set_and_seen() {
    let server = TestServer::spawn().await.unwrap();
    let mut a = registered(&server, "a").await;
    let mut b = registered(&server, "b").await;
    a.join("#room").await.unwrap();

    a.send_raw("TOPIC #room :Rust and crabs").await.unwrap();
    assert_eq!(
        a.recv().await.unwrap(),
        ":a!a@localhost TOPIC #room :Rust and crabs"
    );

    let lines = b.join("#room").await.unwrap();
    assert_eq!(lines[1], ":test.server 332 b #room :Rust and crabs");
}
