// Colored terminal output for book lists, recommendations and status.
//
// All terminal-specific formatting lives here; main.rs only decides what to
// show.

use std::fmt::Display;

use colored::Colorize;

use crate::catalog::models::{Book, PopularBook};
use crate::recommend::engine::{EngineStats, Recommendation};
use crate::recommend::genre::Genre;

use super::truncate_chars;

/// Show the book a recommendation query was made for.
pub fn display_selected_book(book: &Book) {
    println!("\n{}", format!("=== {} ===", book.title).bold());
    println!("  Author:    {}", book.author);
    println!("  Publisher: {}", book.publisher);
    println!("  Year:      {}", book.year.as_deref().unwrap_or("?"));
    if let Some(url) = &book.image_url {
        println!("  Cover:     {}", url.dimmed());
    }
}

/// Display a ranked recommendation list with similarity bars.
pub fn display_recommendations(recs: &[Recommendation<'_>]) {
    if recs.is_empty() {
        println!("No recommendations found, or the book is not in the index.");
        return;
    }

    println!("\n{}", "Recommended books:".bold());
    println!();

    let bar_width: usize = 20;

    for (i, rec) in recs.iter().enumerate() {
        let filled = (rec.score * bar_width as f64).round() as usize;
        let empty = bar_width.saturating_sub(filled);
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

        let colored_bar = if rec.score >= 0.5 {
            bar.bright_green()
        } else if rec.score >= 0.2 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {:<48} {} {:.2}",
            i + 1,
            truncate_chars(&rec.book.title, 45).bold(),
            colored_bar,
            rec.score
        );
        println!("      {} · {}", rec.book.author, rec.book.publisher.dimmed());
    }
    println!();
}

/// Display an unranked list of books, e.g. a genre sample.
pub fn display_book_list(heading: &str, books: &[&Book]) {
    println!("\n{}", heading.bold());
    println!();
    for book in books {
        println!(
            "  - {:<48} {}",
            truncate_chars(&book.title, 45),
            book.author.dimmed()
        );
    }
    println!();
}

/// One line of the popular table. Header and rows share this layout.
fn popular_line(
    rank: impl Display,
    title: impl Display,
    author: impl Display,
    avg: impl Display,
    ratings: impl Display,
) -> String {
    format!("  {rank:>5} {title:<44} {author:<24} {avg:>6}  {ratings:>7}")
}

/// Display the popular books table.
pub fn display_popular(books: &[PopularBook], min_ratings: u32) {
    if books.is_empty() {
        println!("Not enough rating data for a popular list (threshold: {min_ratings} ratings).");
        return;
    }

    println!("\n{}", format!("=== Top {} Books ===", books.len()).bold());
    println!();

    println!(
        "{}",
        popular_line(
            "Rank".dimmed(),
            "Title".dimmed(),
            "Author".dimmed(),
            "Avg".dimmed(),
            "Ratings".dimmed(),
        )
    );
    println!("  {}", "-".repeat(92).dimmed());

    for (i, p) in books.iter().enumerate() {
        let avg = format!("{:.2}", p.avg_rating);
        let colored_avg = if p.avg_rating >= 7.0 {
            avg.bright_green()
        } else if p.avg_rating >= 4.0 {
            avg.yellow()
        } else {
            avg.normal()
        };
        println!(
            "{}",
            popular_line(
                format!("{}.", i + 1),
                truncate_chars(&p.book.title, 41),
                truncate_chars(&p.book.author, 21),
                colored_avg,
                p.num_ratings,
            )
        );
    }
    println!();
}

/// Display the genre table with its keywords.
pub fn display_genres() {
    println!("\n{}", "Genres (matched against titles):".bold());
    for genre in Genre::ALL {
        println!(
            "  {:<8} {}",
            genre.as_str().bold(),
            genre.keywords().join(", ").dimmed()
        );
    }
}

/// Display dataset and model sizes.
pub fn display_status(rows: usize, skipped: usize, stats: &EngineStats) {
    println!("\n{}", "=== Folio status ===".bold());
    println!("  Catalog rows:     {rows} ({skipped} malformed lines skipped)");
    println!(
        "  Model corpus:     {} books, {} unique titles",
        stats.books, stats.unique_titles
    );
    println!(
        "  Vocabulary:       {} terms, {} non-zero weights",
        stats.vocabulary, stats.nonzero_weights
    );
    if stats.empty_documents > 0 {
        println!(
            "  {} {} books have no usable terms and match nothing",
            "~".yellow(),
            stats.empty_documents
        );
    }
    println!(
        "  Similarity matrix: {}",
        format_bytes(stats.similarity_bytes as u64)
    );
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(200_000_000), "190.7 MB");
    }

    #[test]
    fn test_popular_columns_line_up() {
        let header = popular_line("Rank", "Title", "Author", "Avg", "Ratings");
        let row = popular_line("12.", "Dune", "Frank Herbert", "8.25", 140);
        assert_eq!(header.find("Title"), row.find("Dune"));
        assert_eq!(header.find("Author"), row.find("Frank Herbert"));
        assert_eq!(header.len(), row.len());
        assert!(row.starts_with("    12. Dune"));
    }
}
