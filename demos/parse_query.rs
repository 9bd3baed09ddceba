//! Parse a query string from the command line and print the resulting criteria.
//!
//! ```bash
//! cargo run --example parse_query -- 'sort=-name&filter[status]=active&limit=10'
//! ```

use querycrate::RequestCriteria;

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .compact()
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sort=-name&filter[status]=active&limit=10&page=2".to_string());

    let criteria = match RequestCriteria::parse(&query) {
        Ok(criteria) => criteria,
        Err(err) => {
            eprintln!("Invalid query: {err}");
            std::process::exit(1);
        }
    };

    println!("query:  {}", criteria.query());
    println!("phrase: {:?}", criteria.phrase());
    println!("limit:  {:?}", criteria.limit());
    println!("offset: {:?}", criteria.offset());
    println!("page:   {:?}", criteria.page());
    for sort in criteria.sort() {
        println!("sort:   {} {}", sort.field, sort.direction.as_str());
    }
    for filter in criteria.filter() {
        println!("filter: {} {} {:?}", filter.field, filter.operator, filter.value);
    }
    match criteria.query_hash() {
        Ok(hash) => println!("hash:   {hash}"),
        Err(err) => eprintln!("hash failed: {err}"),
    }
}
