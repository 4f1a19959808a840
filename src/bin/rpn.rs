use rpncalc::{bindings_from_json, variable_name, ArgumentOrder, Bindings, Calculator, EvalConfig, Error, Grouping, Separators};
use rpncalc::token::render;
use serde_json::json;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: rpn [options] \"expression\" [var=value ...]");
    eprintln!("       rpn \"expression\" --json '{{\"x\": 2}}'");
    eprintln!("       rpn --file PATH [options]");
    eprintln!("");
    eprintln!("Options:");
    eprintln!("  --output-json    Output result in JSON format with timing");
    eprintln!("  --json JSON      Use JSON object for variable values");
    eprintln!("  --postfix        Print the postfix (RPN) form instead of evaluating");
    eprintln!("  --conventional   Group equal-priority operators left to right");
    eprintln!("  --written-args   Pass function arguments in written order");
    eprintln!("  --flush-separators  Flush pending operators at each ','");
    eprintln!("  --file PATH      Evaluate every non-empty line of PATH");
    eprintln!("");
    eprintln!("Environment:");
    eprintln!("  RPN_GROUPING=right-to-left|conventional");
    eprintln!("  RPN_ARGUMENT_ORDER=reversed|written");
    eprintln!("  RPN_SEPARATORS=ignored|flush");
    eprintln!("  RPN_LOG=<filter>  Log filter, e.g. debug");
    eprintln!("");
    eprintln!("Examples:");
    eprintln!("  rpn \"3 + 4 * 2\"");
    eprintln!("  rpn \"2x + y\" x=3 y=1");
    eprintln!("  rpn \"min(1, 5)\" --output-json");
    eprintln!("  rpn --conventional \"10 - 3 - 2\"");
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("RPN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_json_output(value: f64, postfix: Option<&str>, execution_time_ms: f64) -> String {
    let mut output = json!({
        "result": value,
        "execution_time": format!("{:.2} ms", execution_time_ms)
    });
    if let Some(p) = postfix {
        output["postfix"] = json!(p);
    }
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn run_one(calc: &Calculator, expr: &str, vars: &Bindings, show_postfix: bool, output_json: bool) -> Result<String, Error> {
    let start_time = Instant::now();
    if show_postfix && !output_json {
        return Ok(render(&calc.postfix(expr)?));
    }
    let postfix = if show_postfix { Some(render(&calc.postfix(expr)?)) } else { None };
    let value = calc.result_with(expr, vars)?;
    let execution_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    Ok(if output_json {
        format_json_output(value, postfix.as_deref(), execution_time_ms)
    } else {
        value.to_string()
    })
}

fn main() {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let mut config = EvalConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // Parse arguments and flags
    let mut expr: Option<String> = None;
    let mut file: Option<String> = None;
    let mut json_input = None;
    let mut output_json = false;
    let mut show_postfix = false;
    let mut vars = Bindings::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if arg == "--file" || arg == "--json" {
            if i + 1 >= args.len() {
                eprintln!("Error: {} flag requires an argument", arg);
                std::process::exit(1);
            }
            if arg == "--file" {
                file = Some(args[i + 1].clone());
            } else {
                json_input = Some(args[i + 1].clone());
            }
            i += 1;
        } else if arg == "--output-json" {
            output_json = true;
        } else if arg == "--postfix" {
            show_postfix = true;
        } else if arg == "--conventional" {
            config.grouping = Grouping::Conventional;
        } else if arg == "--written-args" {
            config.argument_order = ArgumentOrder::Written;
        } else if arg == "--flush-separators" {
            config.separators = Separators::Flush;
        } else if let Some((name, value_str)) = arg.split_once('=') {
            let name = variable_name(name.trim()).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            match value_str.trim().parse::<f64>() {
                Ok(value) => {
                    vars.insert(name, value);
                }
                Err(_) => {
                    eprintln!("Invalid value for '{}': '{}' is not a number", name, value_str);
                    std::process::exit(1);
                }
            }
        } else if expr.is_none() {
            // First positional argument without '=' is the expression
            expr = Some(arg.clone());
        } else {
            eprintln!("Invalid variable assignment: '{}'. Use format: var=value", arg);
            std::process::exit(1);
        }

        i += 1;
    }

    if let Some(json_str) = json_input {
        match bindings_from_json(&json_str) {
            Ok(json_vars) => vars.extend(json_vars),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    let calc = Calculator::with_config(config);

    let expressions: Vec<String> = match (expr, file) {
        (Some(e), None) => vec![e],
        (None, Some(path)) => match std::fs::read_to_string(&path) {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                eprintln!("Error: Failed to read '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for e in &expressions {
        match run_one(&calc, e, &vars, show_postfix, output_json) {
            Ok(out) => println!("{}", out),
            Err(err) => {
                eprintln!("Error: {}", err);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(2);
    }
}
