use rpncalc::protocol::{EvalRequest, EvalResponse};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Instant;

fn print_usage() {
    eprintln!("Usage: rpn_client <host:port> <expression> [var=value ...] [--postfix]");
    eprintln!("       rpn_client <host:port> --benchmark <expression> [var=value ...] [iterations]");
    eprintln!("");
    eprintln!("Examples:");
    eprintln!("  rpn_client localhost:8080 '3 + 4 * 2'");
    eprintln!("  rpn_client localhost:8080 '2x + y' x=3 y=1");
    eprintln!("  rpn_client localhost:8080 'min(1, 5)' --postfix");
    eprintln!("  rpn_client localhost:8080 --benchmark '3+4*2' 1000");
}

fn parse_variable(arg: &str) -> Option<(String, serde_json::Value)> {
    let (name, value_str) = arg.split_once('=')?;
    let num = value_str.trim().parse::<f64>().ok()?;
    let number = serde_json::Number::from_f64(num)?;
    Some((name.trim().to_string(), serde_json::Value::Number(number)))
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }

    let server_addr = &args[1];
    let benchmark = args[2] == "--benchmark";
    let first = if benchmark { 3 } else { 2 };

    let expression = match args.get(first) {
        Some(e) => e.clone(),
        None => {
            print_usage();
            std::process::exit(1);
        }
    };

    let mut variables = HashMap::new();
    let mut postfix = false;
    let mut iterations: usize = 100;

    for arg in &args[first + 1..] {
        if arg == "--postfix" {
            postfix = true;
        } else if let Some((name, value)) = parse_variable(arg) {
            variables.insert(name, value);
        } else if let (true, Ok(n)) = (benchmark, arg.parse::<usize>()) {
            iterations = n;
        } else {
            eprintln!("Invalid argument: '{}'. Use format: var=number", arg);
            std::process::exit(1);
        }
    }

    let request = EvalRequest {
        expression,
        variables: if variables.is_empty() { None } else { Some(variables) },
        postfix: if postfix { Some(true) } else { None },
    };

    if benchmark {
        run_benchmark_with_request(server_addr, &request, iterations);
        return;
    }

    match send_request(server_addr, &request) {
        Ok(response) => {
            if response.success {
                if let Some(p) = response.postfix {
                    println!("{}", p);
                }
                match response.result {
                    Some(result) => println!("{}", result),
                    None => println!("null"),
                }
            } else {
                eprintln!("Error: {}", response.error.unwrap_or_else(|| "Unknown error".to_string()));
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("Connection error: {}", e);
            std::process::exit(3);
        }
    }
}

fn send_request(server_addr: &str, request: &EvalRequest) -> Result<EvalResponse, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(server_addr)?;

    let request_json = serde_json::to_string(request)?;
    writeln!(stream, "{}", request_json)?;

    let mut reader = BufReader::new(stream);
    let mut response_line = String::new();
    reader.read_line(&mut response_line)?;

    let response: EvalResponse = serde_json::from_str(&response_line)?;
    Ok(response)
}

fn run_benchmark_with_request(server_addr: &str, request: &EvalRequest, iterations: usize) {
    println!("Benchmarking rpn server");
    println!("=======================");
    println!("Server: {}", server_addr);
    println!("Expression: {}", request.expression);
    println!("Iterations: {}", iterations);
    println!("");

    if let Err(e) = send_request(server_addr, request) {
        eprintln!("Warmup failed: {}", e);
        std::process::exit(1);
    }

    let mut durations = Vec::with_capacity(iterations);
    let mut server_times = Vec::with_capacity(iterations);
    let mut successful = 0usize;
    let mut failed = 0usize;

    let total_start = Instant::now();

    for i in 0..iterations {
        let start = Instant::now();
        match send_request(server_addr, request) {
            Ok(response) => {
                durations.push(start.elapsed().as_secs_f64() * 1000.0);
                server_times.push(response.execution_time_ms);
                if response.success {
                    successful += 1;
                } else {
                    failed += 1;
                    if failed <= 5 { // Show first few errors
                        eprintln!("Error in iteration {}: {}", i, response.error.unwrap_or_else(|| "Unknown".to_string()));
                    }
                }
            }
            Err(e) => {
                failed += 1;
                if failed <= 5 {
                    eprintln!("Connection error in iteration {}: {}", i, e);
                }
            }
        }
    }

    let total_duration = total_start.elapsed();

    if durations.is_empty() {
        eprintln!("All requests failed!");
        std::process::exit(1);
    }

    let avg_client_time = durations.iter().sum::<f64>() / durations.len() as f64;
    let avg_server_time = server_times.iter().sum::<f64>() / server_times.len() as f64;
    let throughput = successful as f64 / total_duration.as_secs_f64();

    let mut sorted = durations.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    println!("Total requests: {}", iterations);
    println!("Successful: {}", successful);
    println!("Failed: {}", failed);
    println!("Total time: {:.2}s", total_duration.as_secs_f64());
    println!("Throughput: {:.1} requests/second", throughput);
    println!("");
    println!("Client-side latency (includes network):");
    println!("  Average: {:.3}ms", avg_client_time);
    println!("  P50: {:.3}ms", percentile(&sorted, 50.0));
    println!("  P95: {:.3}ms", percentile(&sorted, 95.0));
    println!("  P99: {:.3}ms", percentile(&sorted, 99.0));
    println!("");
    println!("Server-side execution time: {:.3}ms average", avg_server_time);
}

fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let index = (p / 100.0 * (sorted_data.len() - 1) as f64) as usize;
    sorted_data[index.min(sorted_data.len() - 1)]
}
