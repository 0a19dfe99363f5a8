use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

use tempfile::TempDir;

fn run(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_prompt-enhancer"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run prompt-enhancer")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Answers `count` generateContent calls with the same candidate text.
fn serve_gemini(count: usize, text: &'static str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/v1beta/models", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        for _ in 0..count {
            let (mut socket, _) = listener.accept().unwrap();
            read_request(&mut socket);

            let body = format!(r#"{{"candidates":[{{"content":{{"parts":[{{"text":"{text}"}}]}}}}]}}"#);
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).unwrap();
        }
    });

    (base_url, handle)
}

fn read_request(socket: &mut impl Read) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).unwrap();
        if n == 0 {
            return;
        }
        buffer.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

#[test]
fn test_empty_prompt_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["enhance", "   "]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Prompt cannot be empty."));
}

#[test]
fn test_missing_api_key_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["enhance", "Tell me about AI"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("API key is not configured"));
    // First run lays out the config files
    assert!(temp_dir.path().join("config.toml").exists());
    assert!(temp_dir.path().join("secret.json").exists());
}

#[test]
fn test_social_login_persists_session() {
    let temp_dir = TempDir::new().unwrap();

    let login = run(temp_dir.path(), &["auth", "login", "Sam@Example.com", "--social"]);
    assert!(login.status.success(), "{}", stderr(&login));

    let whoami = run(temp_dir.path(), &["auth", "whoami"]);
    assert_eq!(stdout(&whoami).trim(), "sam@example.com");

    run(temp_dir.path(), &["auth", "logout"]);
    let whoami = run(temp_dir.path(), &["auth", "whoami"]);
    assert!(!stdout(&whoami).contains("sam@example.com"));
}

#[test]
fn test_signup_twice_fails() {
    let temp_dir = TempDir::new().unwrap();

    let first = run(temp_dir.path(), &["auth", "signup", "ada@example.com", "--password", "pw"]);
    assert!(first.status.success(), "{}", stderr(&first));

    let second = run(temp_dir.path(), &["auth", "signup", "ada@example.com", "--password", "pw"]);
    assert!(!second.status.success());
    assert!(stderr(&second).contains("User with this email already exists."));
}

#[test]
fn test_history_commands_on_empty_store() {
    let temp_dir = TempDir::new().unwrap();

    let list = run(temp_dir.path(), &["history", "list"]);
    assert!(list.status.success());
    assert!(stdout(&list).contains("No history"));

    let clear = run(temp_dir.path(), &["history", "clear", "--yes"]);
    assert!(clear.status.success());

    let show = run(temp_dir.path(), &["history", "show", "123"]);
    assert!(!show.status.success());
}

#[test]
fn test_ephemeral_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["--ephemeral", "auth", "login", "a@b.c", "--social"]);

    assert!(output.status.success());
    assert!(!temp_dir.path().join("store").exists());
    assert!(!temp_dir.path().join("secret.json").exists());
}

#[test]
fn test_enhancement_is_recorded_even_if_output_write_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (base_url, server) = serve_gemini(2, "Enhanced prompt");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        format!("base_url = \"{base_url}\"\n"),
    )
    .unwrap();

    // The data dir itself is a directory, so writing the result there fails
    let output = run(
        temp_dir.path(),
        &[
            "--api-key",
            "test-key",
            "enhance",
            "Tell me about AI",
            "--output",
            temp_dir.path().to_str().unwrap(),
        ],
    );
    server.join().unwrap();

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Enhanced prompt"));

    let list = run(temp_dir.path(), &["history", "list"]);
    assert!(stdout(&list).contains("Tell me about AI"), "{}", stdout(&list));
}
