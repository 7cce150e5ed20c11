//! Integration tests for user queries and registration edge cases.

mod common;

use common::{TestClient, TestServer, command_of};

async fn registered(server: &TestServer, nick: &str) -> TestClient {
    let mut client = TestClient::connect(server.address(), nick)
        .await
        .expect("Failed to connect");
    client.register().await.expect("Registration failed");
    client
}

#[tokio::test]
async fn test_who_glob_mask() {
    let server = TestServer::spawn().await.unwrap();
    let mut asker = registered(&server, "asker").await;
    let _a = registered(&server, "bignick").await;
    let _b = registered(&server, "other").await;

    asker.send_raw("WHO *nick").await.unwrap();
    let lines = asker.recv_until_command("315").await.unwrap();
    assert_eq!(
        lines,
        vec![
            ":test.server 352 asker * bignick localhost test.server bignick H :0 Test User bignick",
            ":test.server 315 asker *nick :End of WHO list",
        ]
    );
}

#[tokio::test]
async fn test_who_everyone() {
    let server = TestServer::spawn().await.unwrap();
    let mut asker = registered(&server, "asker").await;
    let _a = registered(&server, "other").await;

    asker.send_raw("WHO").await.unwrap();
    let lines = asker.recv_until_command("315").await.unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], ":test.server 315 asker * :End of WHO list");
}

#[tokio::test]
async fn test_list_channels() {
    let server = TestServer::spawn().await.unwrap();
    let mut a = registered(&server, "a").await;
    a.join("#beta").await.unwrap();
    a.join("#alpha").await.unwrap();

    a.send_raw("LIST").await.unwrap();
    let lines = a.recv_until_command("323").await.unwrap();
    assert_eq!(
        lines,
        vec![
            ":test.server 321 a Channel :Users  Name",
            ":test.server 322 a #alpha 1 :No topic",
            ":test.server 322 a #beta 1 :No topic",
            ":test.server 323 a :End of /LIST",
        ]
    );
}

#[tokio::test]
async fn test_nick_collision() {
    let server = TestServer::spawn().await.unwrap();
    let _first = registered(&server, "alice").await;

    let mut second = TestClient::connect(server.address(), "alice").await.unwrap();
    second.send_raw("NICK alice").await.unwrap();
    assert_eq!(
        second.recv().await.unwrap(),
        ":test.server 433 * alice :Nickname is already in use"
    );

    second.send_raw("NICK alice2").await.unwrap();
    second.send_raw("USER alice2 0 * :Second").await.unwrap();
    let burst = second.recv_until_command("376").await.unwrap();
    assert_eq!(command_of(&burst[0]), "001");
}

#[tokio::test]
async fn test_cap_negotiation_delays_welcome() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::connect(server.address(), "alice").await.unwrap();

    client.send_raw("CAP LS 302").await.unwrap();
    client.send_raw("NICK alice").await.unwrap();
    client.send_raw("USER alice 0 * :Alice").await.unwrap();
    client.send_raw("CAP REQ :sasl").await.unwrap();
    assert_eq!(client.recv().await.unwrap(), ":test.server CAP * LS :");
    assert_eq!(client.recv().await.unwrap(), ":test.server CAP alice NAK :sasl");

    client.send_raw("CAP END").await.unwrap();
    let burst = client.recv_until_command("376").await.unwrap();
    assert_eq!(command_of(&burst[0]), "001");
}
