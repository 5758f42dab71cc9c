//! Output formatting for CLI

use crate::{
    classifier::ConfusionMatrix,
    tictactoe::Board,
    types::MoveScore,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a rate as a percentage
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print a board indented, one row per line
pub fn print_board(board: &Board) {
    for row in board.to_string().lines() {
        println!("  {row}");
    }
}

/// Print per-move scores, marking the chosen cell
pub fn print_move_scores(scores: &[MoveScore], chosen: usize) {
    for score in scores {
        let marker = if score.position == chosen { " <" } else { "" };
        println!("  cell {}  {:.6}{marker}", score.position, score.probability);
    }
}

/// Print a confusion matrix as a plain-text table
pub fn print_confusion(matrix: &ConfusionMatrix) {
    let classes = matrix.classes();
    let width = classes
        .iter()
        .map(|c| c.as_str().len())
        .max()
        .unwrap_or(0)
        .max(8);

    print!("  {:width$}", "actual", width = width);
    for predicted in classes {
        print!("  {:>width$}", predicted.as_str(), width = width);
    }
    println!();
    for actual in classes {
        print!("  {:width$}", actual.as_str(), width = width);
        for predicted in classes {
            print!(
                "  {:>width$}",
                format_number(matrix.count(actual, predicted)),
                width = width
            );
        }
        println!();
    }
}
