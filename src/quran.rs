use serde::{Deserialize, Serialize};

use crate::api::{fetch_json, Endpoints, Fetcher};
use crate::error::{ChapterError, KeywordError};

/// Highest surah number. Advertised to the user, not enforced before fetching.
pub const SURAH_COUNT: i64 = 114;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub index: i64,
    pub text: String,
}

/// A surah located in the fetched corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterResult {
    pub number: i64,
    pub name: String,
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub chapter_number: i64,
    pub verse_index: i64,
    pub text: String,
}

/// Search hits in the order the API returned them. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub matches: Vec<Match>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

// Wire shapes. Only the fields the pipelines read are declared.

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct CorpusData {
    surahs: Vec<SurahDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurahDto {
    number: i64,
    english_name: String,
    ayahs: Vec<AyahDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AyahDto {
    number_in_surah: i64,
    text: String,
}

#[derive(Deserialize)]
struct SearchData {
    matches: Vec<MatchDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchDto {
    surah: MatchSurahDto,
    number_in_surah: i64,
    text: String,
}

#[derive(Deserialize)]
struct MatchSurahDto {
    number: i64,
}

/// Trim and parse a surah number. Anything that is not an integer counts as no input.
pub fn parse_surah_number(input: &str) -> Result<i64, ChapterError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ChapterError::EmptyInput);
    }
    trimmed.parse::<i64>().map_err(|_| ChapterError::EmptyInput)
}

/// Trim a search term, rejecting blank input.
pub fn parse_keyword(input: &str) -> Result<&str, KeywordError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(KeywordError::EmptyInput);
    }
    Ok(trimmed)
}

/// Fetch the whole corpus and return the surah numbered `input`.
///
/// Numbers outside 1..=114 are still looked up and come back as `NotFound`.
pub async fn lookup_chapter(
    fetcher: &dyn Fetcher,
    endpoints: &Endpoints,
    input: &str,
) -> Result<ChapterResult, ChapterError> {
    let number = parse_surah_number(input)?;
    if !(1..=SURAH_COUNT).contains(&number) {
        tracing::debug!(number, "surah number outside advertised range, looking it up anyway");
    }

    let value = fetch_json(fetcher, &endpoints.corpus_url())
        .await
        .ok_or(ChapterError::FetchFailed)?;
    let corpus: Envelope<CorpusData> = serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "corpus response missing expected structure");
        ChapterError::FetchFailed
    })?;

    let surah = corpus
        .data
        .surahs
        .into_iter()
        .find(|s| s.number == number)
        .ok_or(ChapterError::NotFound(number))?;

    tracing::info!(number, name = %surah.english_name, ayahs = surah.ayahs.len(), "surah found");

    Ok(ChapterResult {
        number: surah.number,
        name: surah.english_name,
        verses: surah
            .ayahs
            .into_iter()
            .map(|a| Verse {
                index: a.number_in_surah,
                text: a.text,
            })
            .collect(),
    })
}

/// Search ayahs containing `input`.
///
/// A well-formed reply whose `data` has no `matches` array (the API's "Not
/// found" envelope) is zero matches, not an error.
pub async fn search_keyword(
    fetcher: &dyn Fetcher,
    endpoints: &Endpoints,
    input: &str,
) -> Result<MatchResult, KeywordError> {
    let term = parse_keyword(input)?;

    let value = fetch_json(fetcher, &endpoints.search_url(term))
        .await
        .ok_or(KeywordError::FetchFailed)?;

    let data = match value.get("data") {
        Some(data) => data,
        None => {
            tracing::warn!("search response has no data field");
            return Err(KeywordError::FetchFailed);
        }
    };

    if data.get("matches").is_none() {
        tracing::info!(term, "no matches");
        return Ok(MatchResult::default());
    }

    let search: SearchData = serde_json::from_value(data.clone()).map_err(|e| {
        tracing::warn!(error = %e, "search response missing expected structure");
        KeywordError::FetchFailed
    })?;

    tracing::info!(term, matches = search.matches.len(), "search complete");

    Ok(MatchResult {
        matches: search
            .matches
            .into_iter()
            .map(|m| Match {
                chapter_number: m.surah.number,
                verse_index: m.number_in_surah,
                text: m.text,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedFetcher;

    const CORPUS: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "surahs": [
                {
                    "number": 1,
                    "name": "سُورَةُ ٱلْفَاتِحَةِ",
                    "englishName": "Al-Faatiha",
                    "ayahs": [
                        {"number": 1, "numberInSurah": 1, "text": "بِسْمِ ٱللَّهِ"}
                    ]
                },
                {
                    "number": 112,
                    "englishName": "Al-Ikhlaas",
                    "ayahs": [
                        {"numberInSurah": 1, "text": "first"},
                        {"numberInSurah": 2, "text": "second"},
                        {"numberInSurah": 3, "text": "third"},
                        {"numberInSurah": 4, "text": "fourth"}
                    ]
                }
            ]
        }
    }"#;

    const LIGHT: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "count": 1,
            "matches": [
                {
                    "number": 2793,
                    "text": "Allah is the Light of the heavens and the earth.",
                    "edition": {"identifier": "en.asad"},
                    "surah": {"number": 24, "englishName": "An-Noor"},
                    "numberInSurah": 35
                }
            ]
        }
    }"#;

    #[tokio::test]
    async fn test_blank_surah_input_skips_network() {
        for input in ["", "   ", "\t\n"] {
            let fetcher = ScriptedFetcher::replying(CORPUS);
            let result = lookup_chapter(&fetcher, &Endpoints::default(), input).await;
            assert_eq!(result, Err(ChapterError::EmptyInput));
            assert_eq!(fetcher.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_non_numeric_surah_input_skips_network() {
        for input in ["abc", "1.5", "one", "12x"] {
            let fetcher = ScriptedFetcher::replying(CORPUS);
            let result = lookup_chapter(&fetcher, &Endpoints::default(), input).await;
            assert_eq!(result, Err(ChapterError::EmptyInput), "input {input:?}");
            assert_eq!(fetcher.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_lookup_first_surah() {
        let fetcher = ScriptedFetcher::replying(CORPUS);
        let chapter = lookup_chapter(&fetcher, &Endpoints::default(), " 1 ").await.unwrap();
        assert_eq!(chapter.number, 1);
        assert_eq!(chapter.name, "Al-Faatiha");
        assert_eq!(
            chapter.verses,
            vec![Verse { index: 1, text: "بِسْمِ ٱللَّهِ".to_string() }]
        );
        assert_eq!(fetcher.urls(), vec!["https://api.alquran.cloud/v1/quran/ar.alafasy"]);
    }

    #[tokio::test]
    async fn test_verses_keep_original_order() {
        let fetcher = ScriptedFetcher::replying(CORPUS);
        let chapter = lookup_chapter(&fetcher, &Endpoints::default(), "112").await.unwrap();
        let texts: Vec<&str> = chapter.verses.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third", "fourth"]);
        let indexes: Vec<i64> = chapter.verses.iter().map(|v| v.index).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_missing_surah_is_not_found() {
        let fetcher = ScriptedFetcher::replying(CORPUS);
        let result = lookup_chapter(&fetcher, &Endpoints::default(), "2").await;
        assert_eq!(result, Err(ChapterError::NotFound(2)));
    }

    #[tokio::test]
    async fn test_out_of_range_is_fetched_then_not_found() {
        for (input, number) in [("0", 0), ("200", 200), ("-3", -3)] {
            let fetcher = ScriptedFetcher::replying(CORPUS);
            let result = lookup_chapter(&fetcher, &Endpoints::default(), input).await;
            assert_eq!(result, Err(ChapterError::NotFound(number)));
            assert_eq!(fetcher.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_corpus_transport_failure() {
        let fetcher = ScriptedFetcher::failing("dns error");
        let result = lookup_chapter(&fetcher, &Endpoints::default(), "1").await;
        assert_eq!(result, Err(ChapterError::FetchFailed));
    }

    #[tokio::test]
    async fn test_corpus_wrong_shape() {
        for body in [
            "not json at all",
            r#"{"code": 404, "status": "Not Found", "data": "Not found"}"#,
            r#"{"data": {"surahs": "nope"}}"#,
            r#"{"status": "OK"}"#,
        ] {
            let fetcher = ScriptedFetcher::replying(body);
            let result = lookup_chapter(&fetcher, &Endpoints::default(), "1").await;
            assert_eq!(result, Err(ChapterError::FetchFailed), "body {body}");
        }
    }

    #[tokio::test]
    async fn test_blank_keyword_skips_network() {
        for input in ["", "  ", "\n"] {
            let fetcher = ScriptedFetcher::replying(LIGHT);
            let result = search_keyword(&fetcher, &Endpoints::default(), input).await;
            assert_eq!(result, Err(KeywordError::EmptyInput));
            assert_eq!(fetcher.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_search_light() {
        let fetcher = ScriptedFetcher::replying(LIGHT);
        let result = search_keyword(&fetcher, &Endpoints::default(), " light ").await.unwrap();
        assert_eq!(
            result.matches,
            vec![Match {
                chapter_number: 24,
                verse_index: 35,
                text: "Allah is the Light of the heavens and the earth.".to_string(),
            }]
        );
        assert_eq!(fetcher.urls(), vec!["https://api.alquran.cloud/v1/search/light/all/en"]);
    }

    #[tokio::test]
    async fn test_search_keeps_api_order() {
        let body = r#"{"data": {"count": 3, "matches": [
            {"surah": {"number": 57}, "numberInSurah": 28, "text": "c"},
            {"surah": {"number": 2}, "numberInSurah": 257, "text": "a"},
            {"surah": {"number": 24}, "numberInSurah": 35, "text": "b"}
        ]}}"#;
        let fetcher = ScriptedFetcher::replying(body);
        let result = search_keyword(&fetcher, &Endpoints::default(), "light").await.unwrap();
        let order: Vec<(i64, i64)> = result
            .matches
            .iter()
            .map(|m| (m.chapter_number, m.verse_index))
            .collect();
        assert_eq!(order, vec![(57, 28), (2, 257), (24, 35)]);
    }

    #[tokio::test]
    async fn test_zero_matches_is_success() {
        let fetcher = ScriptedFetcher::replying(r#"{"data": {"count": 0, "matches": []}}"#);
        let result = search_keyword(&fetcher, &Endpoints::default(), "zzzz").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_envelope_is_zero_matches() {
        let fetcher = ScriptedFetcher::replying(
            r#"{"code": 404, "status": "Not Found", "data": "Not found"}"#,
        );
        let result = search_keyword(&fetcher, &Endpoints::default(), "zzzz").await.unwrap();
        assert_eq!(result, MatchResult::default());
    }

    #[tokio::test]
    async fn test_search_failures() {
        let fetcher = ScriptedFetcher::failing("timed out");
        let result = search_keyword(&fetcher, &Endpoints::default(), "light").await;
        assert_eq!(result, Err(KeywordError::FetchFailed));

        for body in [
            "<html></html>",
            r#"{"code": 200}"#,
            r#"{"data": {"matches": [{"text": "no surah"}]}}"#,
        ] {
            let fetcher = ScriptedFetcher::replying(body);
            let result = search_keyword(&fetcher, &Endpoints::default(), "light").await;
            assert_eq!(result, Err(KeywordError::FetchFailed), "body {body}");
        }
    }

    #[tokio::test]
    async fn test_search_term_is_encoded_in_request() {
        let fetcher = ScriptedFetcher::replying(r#"{"data": {"matches": []}}"#);
        search_keyword(&fetcher, &Endpoints::default(), "the light").await.unwrap();
        assert_eq!(
            fetcher.urls(),
            vec!["https://api.alquran.cloud/v1/search/the%20light/all/en"]
        );
    }
}
