use rpncalc::protocol::{handle_line, ServerStats};
use rpncalc::{Calculator, EvalConfig};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, atomic::{AtomicU64, AtomicBool, Ordering}};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Expression evaluation server
/// Keeps one calculator in memory and serves newline-delimited JSON requests
/// from a pool of worker threads

fn handle_client(stream: TcpStream, calc: Arc<Calculator>, stats: Arc<ServerStats>, request_counter: Arc<AtomicU64>) {
    let peer = stream.peer_addr().map(|a| a.to_string()).unwrap_or_else(|_| "unknown".to_string());
    let reader = match stream.try_clone() {
        Ok(s) => BufReader::new(s),
        Err(e) => {
            warn!(%peer, "failed to clone connection: {}", e);
            return;
        }
    };
    let mut stream = stream;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        if line.trim().is_empty() {
            continue;
        }

        let request_id = request_counter.fetch_add(1, Ordering::Relaxed);
        let start_time = Instant::now();

        let response_json = handle_line(&calc, &line, request_id);

        stats.record_request(start_time.elapsed().as_micros() as u64);

        if writeln!(stream, "{}", response_json).is_err() {
            break;
        }

        // Log request for monitoring
        if request_id % 1000 == 0 {
            let (total_requests, avg_time) = stats.get_stats();
            info!("Processed {} requests, avg execution time: {:.2}ms", total_requests, avg_time);
        }
    }
}

fn setup_signal_handlers() -> Arc<AtomicBool> {
    // Handle SIGTERM and SIGINT gracefully
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal, gracefully stopping...");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Error setting signal handler: {}", e);
    }
    running
}

fn main() {
    let filter = EnvFilter::try_from_env("RPN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: rpn_server <port> [num_threads]");
        eprintln!("");
        eprintln!("Environment:");
        eprintln!("  RPN_SERVER_HOST       Bind address (default: 127.0.0.1)");
        eprintln!("  RPN_GROUPING          right-to-left | conventional");
        eprintln!("  RPN_ARGUMENT_ORDER    reversed | written");
        eprintln!("  RPN_SEPARATORS        ignored | flush");
        eprintln!("");
        eprintln!("Examples:");
        eprintln!("  rpn_server 8080              # Start server on port 8080");
        eprintln!("  rpn_server 8080 16           # Start with 16 worker threads");
        eprintln!("");
        eprintln!("Protocol: Send JSON requests as newline-delimited messages");
        eprintln!("Request format: {{\"expression\": \"2x+1\", \"variables\": {{\"x\": 10}}, \"postfix\": true}}");
        std::process::exit(1);
    }

    let port: u16 = args[1].parse().unwrap_or_else(|_| {
        eprintln!("Error: Invalid port number");
        std::process::exit(1);
    });

    let num_threads: usize = match args.get(2) {
        Some(n) => n.parse().unwrap_or_else(|_| {
            eprintln!("Error: Invalid thread count: {}", n);
            std::process::exit(1);
        }),
        None => num_cpus::get(),
    };

    let config = EvalConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let host = std::env::var("RPN_SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let running = setup_signal_handlers();

    let listener = TcpListener::bind(format!("{}:{}", host, port))
        .unwrap_or_else(|e| {
            eprintln!("Error: Failed to bind to {}:{}: {}", host, port, e);
            std::process::exit(1);
        });

    // Make listener non-blocking so we can check shutdown flag
    listener
        .set_nonblocking(true)
        .unwrap_or_else(|e| {
            eprintln!("Error: Failed to set non-blocking mode: {}", e);
            std::process::exit(1);
        });

    let calc = Arc::new(Calculator::with_config(config));
    let stats = Arc::new(ServerStats::new());
    let request_counter = Arc::new(AtomicU64::new(0));

    info!(%host, port, threads = num_threads, ?config, "rpn server started");

    let pool = threadpool::ThreadPool::new(num_threads.max(1));

    // Accept loop that can be interrupted by Ctrl+C
    while running.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, _addr)) => {
                // Workers use blocking reads on their own connection.
                if let Err(e) = stream.set_nonblocking(false) {
                    warn!("Failed to set blocking mode on connection: {}", e);
                    continue;
                }
                let calc = Arc::clone(&calc);
                let stats = Arc::clone(&stats);
                let request_counter = Arc::clone(&request_counter);
                pool.execute(move || {
                    handle_client(stream, calc, stats, request_counter);
                });
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                // No pending connections; sleep briefly and check again
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        }
    }

    // Wait for outstanding tasks to complete
    pool.join();
    let (total_requests, avg_time) = stats.get_stats();
    info!("Server shutdown complete. {} requests, avg {:.2}ms", total_requests, avg_time);
}
