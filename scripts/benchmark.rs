// scripts/benchmark.rs
use std::env;
use std::fs::File;
use std::io::Write;

use wheel_mc::math_utils::Timer;
use wheel_mc::mc::wheel_engine::{run_wheel_simulation, WheelConfig};

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    time_ms: f64,
    throughput_paths_per_sec: f64,
    avg_missed_trades: f64,
    avg_money_spent: f64,
}

fn run_wheel_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    let paths_configs = [1_000, 10_000, 100_000];

    for &paths in &paths_configs {
        println!("Running benchmark with {} paths...", paths);

        let cfg = WheelConfig {
            paths,
            periods: 120,
            s0: 100.0,
            sigma: 0.2,
            r: 0.01,
            calls_deadline: 7,
            write_puts_if_no_calls: true,
            seed: 42,
            ..Default::default()
        };

        let mut timer = Timer::new();
        timer.start();
        let output = run_wheel_simulation(&cfg).expect("Valid configuration");
        let time_ms = timer.elapsed_ms();
        let throughput = paths as f64 / (time_ms / 1000.0);

        let avg_missed =
            output.missed_trades.iter().map(|&m| m as f64).sum::<f64>() / paths as f64;
        let avg_spent = output.money_spent.iter().sum::<f64>() / paths as f64;

        results.push(BenchmarkResult {
            name: format!("Wheel 120 periods ({}k paths)", paths / 1000),
            paths,
            time_ms,
            throughput_paths_per_sec: throughput,
            avg_missed_trades: avg_missed,
            avg_money_spent: avg_spent,
        });
    }

    results
}

fn write_results_to_csv(results: &[BenchmarkResult], system_info: &SystemInfo, filename: &str) {
    let mut file = File::create(filename).expect("Could not create CSV file");

    writeln!(file, "# System Information").unwrap();
    writeln!(file, "# OS: {}", system_info.os).unwrap();
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores).unwrap();
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags).unwrap();
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads).unwrap();
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .unwrap();
    writeln!(file, "#").unwrap();

    writeln!(
        file,
        "Benchmark,Paths,Time_ms,Throughput_paths_per_sec,Avg_Missed_Trades,Avg_Money_Spent"
    )
    .unwrap();

    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{:.3},{:.2}",
            result.name,
            result.paths,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.avg_missed_trades,
            result.avg_money_spent
        )
        .unwrap();
    }

    println!("Results written to {}", filename);
}

fn main() {
    println!("wheel-mc Benchmark Suite");
    println!("========================\n");

    let system_info = SystemInfo::gather();

    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let results = run_wheel_benchmarks();

    println!("\n{:=<90}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<90}", "");
    println!(
        "{:<32} {:>8} {:>12} {:>15} {:>10} {:>10}",
        "Benchmark", "Paths", "Time (ms)", "Throughput", "Missed", "Spent"
    );
    println!("{:-<90}", "");

    for result in &results {
        println!(
            "{:<32} {:>8} {:>12.2} {:>15.0} {:>10.3} {:>10.2}",
            result.name,
            result.paths,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.avg_missed_trades,
            result.avg_money_spent
        );
    }

    println!("{:=<90}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    write_results_to_csv(&results, &system_info, &filename);

    println!("\nBenchmark complete!");
    println!("To reproduce: cargo run --bin benchmark --release");
}
