use std::error::Error;

use clap::{Parser, Subcommand};
use coursework::{Triangle, exercises};

#[derive(Parser, Debug)]
#[command(name = "coursework")]
#[command(about = "Triangle classification and small numeric exercises")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a triangle by its three sides.
    Triangle {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
        #[arg(allow_negative_numbers = true)]
        c: f64,
    },
    /// Print the smallest of three numbers.
    Min {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
        #[arg(allow_negative_numbers = true)]
        c: f64,
    },
    /// Check which numbers fall into [1, 50].
    Interval {
        #[arg(required = true, allow_negative_numbers = true)]
        numbers: Vec<f64>,
    },
    /// Multiplication table of a number.
    Table {
        #[arg(allow_negative_numbers = true)]
        number: f64,
    },
    /// Sum and count whitespace-separated integers.
    Sum { input: String },
    /// Replace `a`/`A` with `o`/`O`.
    Replace { input: String },
    /// Largest element with its index and the odd elements in descending order.
    MaxOdd {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Triangle { a, b, c } => {
            let triangle = Triangle::new(a, b, c)?;
            println!(
                "Triangle type: {}, perimeter: {}",
                triangle.kind(),
                triangle.perimeter()
            );
        }
        Command::Min { a, b, c } => {
            println!("Minimum: {}", exercises::min_of_three(a, b, c));
        }
        Command::Interval { numbers } => {
            for (n, inside) in exercises::in_interval(&numbers) {
                let verdict = if inside { "is" } else { "is not" };
                println!("{n} {verdict} in [1, 50]");
            }
        }
        Command::Table { number } => {
            for (i, value) in exercises::multiplication_table(number) {
                println!("{i} * {number} = {value}");
            }
        }
        Command::Sum { input } => {
            let (sum, count) = exercises::sum_and_count(&input)?;
            println!("Sum: {sum}");
            println!("Count: {count}");
        }
        Command::Replace { input } => {
            let replaced = exercises::replace_a_with_o(&input);
            println!("Replacements: {}", replaced.replacements);
            println!("Characters: {}", replaced.characters);
            println!("Result: {}", replaced.text);
        }
        Command::MaxOdd { values } => {
            let Some(result) = exercises::max_and_odd(&values) else {
                return Err("the array must not be empty".into());
            };
            println!("Max: {}, index: {}", result.max, result.index);
            if result.odd_desc.is_empty() {
                println!("No odd elements.");
            } else {
                let odd: Vec<String> = result.odd_desc.iter().map(i64::to_string).collect();
                println!("Odd elements, descending: {}", odd.join(" "));
            }
        }
    }

    Ok(())
}
