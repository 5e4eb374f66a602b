/// A remote operation together with its path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    SearchWord {
        query: &'a str,
        datasets: Option<&'a str>,
    },
    WordDetails {
        word_id: u64,
        datasets: Option<&'a str>,
    },
    SearchMeaning {
        query: &'a str,
        datasets: Option<&'a str>,
    },
    MeaningDetails {
        meaning_id: u64,
        datasets: Option<&'a str>,
    },
    Datasets,
    Classifiers {
        classifier_type: &'a str,
    },
    Domains {
        origin: &'a str,
    },
    DomainOrigins,
}

impl Route<'_> {
    /// Builds the request path, relative to the API base URL.
    ///
    /// An empty dataset filter is treated the same as no filter.
    pub fn path(&self) -> String {
        match *self {
            Route::SearchWord { query, datasets } => {
                with_datasets(format!("/api/word/search/{}", encode_segment(query)), datasets)
            }
            Route::WordDetails { word_id, datasets } => {
                with_datasets(format!("/api/word/details/{}", word_id), datasets)
            }
            Route::SearchMeaning { query, datasets } => with_datasets(
                format!("/api/meaning/search/{}", encode_segment(query)),
                datasets,
            ),
            Route::MeaningDetails {
                meaning_id,
                datasets,
            } => with_datasets(format!("/api/meaning/details/{}", meaning_id), datasets),
            Route::Datasets => "/api/datasets".to_string(),
            Route::Classifiers { classifier_type } => {
                format!("/api/classifiers/{}", encode_segment(classifier_type))
            }
            Route::Domains { origin } => format!("/api/domains/{}", encode_segment(origin)),
            Route::DomainOrigins => "/api/domainorigins".to_string(),
        }
    }
}

fn with_datasets(mut path: String, datasets: Option<&str>) -> String {
    if let Some(datasets) = datasets.filter(|d| !d.is_empty()) {
        path.push('/');
        path.push_str(&encode_segment(datasets));
    }
    path
}

/// Percent-encodes one path segment.
///
/// Leaves `*`, `!`, `'`, `(` and `)` intact on top of the unreserved set, so
/// Ekilex wildcard queries such as `ter*` reach the API unchanged.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment)
        .replace("%2A", "*")
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
}
