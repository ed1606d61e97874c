// Composition tests: the full chain from raw CSV bytes to query results.
//
//   CSV -> Table -> Books -> Engine -> recommend / by_category
//   CSV -> Ratings -> top_books
//
// No files, no network; everything is read from in-memory slices.

use rand::rngs::StdRng;
use rand::SeedableRng;

use folio::catalog::loader::{read_ratings, read_table};
use folio::popularity::top_books;
use folio::Engine;

const BOOKS: &[u8] = b"ISBN;Book-Title;Book-Author;Year-Of-Publication;Publisher;Image-URL-M
0001;The Hobbit;J.R.R. Tolkien;1937;Houghton Mifflin;http://m/1
0002;The Two Towers;J.R.R. Tolkien;1954;Houghton Mifflin;http://m/2
0003;Dune;Frank Herbert;1965;Ace;http://m/3
0004;Children of Dune;Frank Herbert;1976;Ace;http://m/4
0005;The Murder of Roger Ackroyd;Agatha Christie;1926;Collins;http://m/5
0006;Death on the Nile;Agatha Christie;1937;Collins;http://m/6
0007;Broken;Line;With;Too;Many;Fields
0008;Interview with the Vampire;Anne Rice;1976;Knopf;http://m/8
0009;Salem's Lot;Stephen King;1975;Doubleday;http://m/9
";

const RATINGS: &[u8] = b"User-ID;ISBN;Book-Rating
1;0001;9
2;0001;10
3;0001;8
1;0003;7
2;0003;0
3;0003;8
4;0005;10
";

fn engine(limit: Option<usize>) -> Engine {
    let loaded = read_table(BOOKS).unwrap();
    assert_eq!(loaded.skipped, 1);
    Engine::from_table(&loaded.table, limit).unwrap()
}

#[test]
fn csv_to_recommendations() {
    let engine = engine(None);
    assert_eq!(engine.len(), 8);

    let recs = engine.recommend("Dune", 1);
    assert_eq!(recs[0].book.title, "Children of Dune");

    let recs = engine.recommend("Death on the Nile", 1);
    assert_eq!(recs[0].book.title, "The Murder of Roger Ackroyd");
}

#[test]
fn corpus_cap_limits_what_can_be_recommended() {
    let engine = engine(Some(3));
    assert_eq!(engine.len(), 3);
    let recs = engine.recommend("Dune", 10);
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.book.title != "Children of Dune"));
    assert!(engine.recommend("Salem's Lot", 5).is_empty());
}

#[test]
fn csv_to_genre_browsing() {
    let engine = engine(None);
    let mut rng = StdRng::seed_from_u64(3);

    let mystery: Vec<&str> = engine
        .by_category("Mystery", 10, &mut rng)
        .into_iter()
        .map(|b| b.title.as_str())
        .collect();
    assert_eq!(mystery, vec!["The Murder of Roger Ackroyd"]);

    // Horror matches the title keyword only; the author field is ignored
    let horror: Vec<&str> = engine
        .by_category("Horror", 10, &mut rng)
        .into_iter()
        .map(|b| b.title.as_str())
        .collect();
    assert_eq!(horror, vec!["Interview with the Vampire"]);
}

#[test]
fn csv_to_popular_list() {
    let books = read_table(BOOKS).unwrap().table.books().unwrap();
    let ratings = read_ratings(RATINGS).unwrap().ratings;

    let top = top_books(&books, &ratings, 3, 50);
    let titles: Vec<&str> = top.iter().map(|p| p.book.title.as_str()).collect();
    // 0001 averages 9, 0003 averages 5; 0005 has one rating
    assert_eq!(titles, vec!["The Hobbit", "Dune"]);
    assert!((top[1].avg_rating - 5.0).abs() < 1e-12);
}
