//! First-match lookups over loosely specified vendor responses.
//!
//! Each response field we care about may live at several paths depending on
//! the vendor API revision. Candidates are listed as named accessors and tried
//! in order; the first accessor that yields an acceptable value wins.

use serde_json::Value;

pub struct Accessor {
    pub path: &'static str,
    pub get: fn(&Value) -> Option<&Value>,
}

macro_rules! accessor {
    ($outer:literal . $key:literal) => {
        Accessor {
            path: concat!($outer, ".", $key),
            get: |v| v.get($outer).and_then(|inner| inner.get($key)),
        }
    };
    ($key:literal) => {
        Accessor {
            path: $key,
            get: |v| v.get($key),
        }
    };
}

pub const JOB_ID_ACCESSORS: &[Accessor] = &[
    accessor!("job_id"),
    accessor!("jobId"),
    accessor!("id"),
    accessor!("data"."job_id"),
    accessor!("data"."jobId"),
    accessor!("data"."id"),
];

pub const STATUS_ACCESSORS: &[Accessor] = &[
    accessor!("status"),
    accessor!("state"),
    accessor!("data"."status"),
    accessor!("data"."state"),
    accessor!("result"."status"),
];

pub const VIDEO_URL_ACCESSORS: &[Accessor] = &[
    accessor!("video_url"),
    accessor!("videoUrl"),
    accessor!("url"),
    accessor!("download_url"),
    accessor!("downloadUrl"),
    accessor!("output_url"),
    accessor!("outputUrl"),
    accessor!("result_url"),
    accessor!("resultUrl"),
    accessor!("data"."video_url"),
    accessor!("data"."videoUrl"),
    accessor!("data"."url"),
    accessor!("data"."download_url"),
    accessor!("data"."downloadUrl"),
    accessor!("data"."output_url"),
    accessor!("data"."outputUrl"),
    accessor!("result"."video_url"),
    accessor!("result"."videoUrl"),
    accessor!("result"."url"),
];

pub const GENERATED_TEXT_ACCESSORS: &[Accessor] = &[
    Accessor {
        path: "choices[0].message.content",
        get: |v| {
            v.get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("message"))
                .and_then(|m| m.get("content"))
        },
    },
    accessor!("output_text"),
    accessor!("data"."text"),
];

/// Returns the first accepted value along with the path it was found at.
pub fn first_match<T>(
    response: &Value,
    accessors: &[Accessor],
    accept: impl Fn(&Value) -> Option<T>,
) -> Option<(&'static str, T)> {
    accessors
        .iter()
        .find_map(|a| (a.get)(response).and_then(&accept).map(|found| (a.path, found)))
}

pub fn extract_job_id(response: &Value) -> Option<String> {
    first_match(response, JOB_ID_ACCESSORS, |v| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
    .map(|(_, id)| id)
}

pub fn extract_status(response: &Value) -> Option<String> {
    first_match(response, STATUS_ACCESSORS, non_empty_string).map(|(_, s)| s)
}

pub fn extract_video_url(response: &Value) -> Option<String> {
    first_match(response, VIDEO_URL_ACCESSORS, |v| {
        v.as_str()
            .filter(|s| s.contains("http") || s.contains(".mp4"))
            .map(str::to_string)
    })
    .map(|(_, url)| url)
}

pub fn extract_generated_text(response: &Value) -> Option<String> {
    first_match(response, GENERATED_TEXT_ACCESSORS, non_empty_string).map(|(_, s)| s)
}

fn non_empty_string(v: &Value) -> Option<String> {
    v.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_id_paths() {
        assert_eq!(extract_job_id(&json!({"job_id": "a1"})), Some("a1".into()));
        assert_eq!(extract_job_id(&json!({"jobId": "b2"})), Some("b2".into()));
        assert_eq!(extract_job_id(&json!({"id": 42})), Some("42".into()));
        assert_eq!(
            extract_job_id(&json!({"data": {"jobId": "c3"}})),
            Some("c3".into())
        );
        assert_eq!(extract_job_id(&json!({"data": {}})), None);
    }

    #[test]
    fn test_job_id_order_and_skips() {
        // Empty job_id falls through to the next accessor
        let response = json!({"job_id": "", "id": "fallback", "data": {"id": "nested"}});
        assert_eq!(extract_job_id(&response), Some("fallback".into()));
    }

    #[test]
    fn test_video_url_first_valid_wins() {
        let response = json!({
            "video_url": null,
            "url": "pending",
            "data": {"outputUrl": "https://cdn.example.com/v/1.mp4"},
            "result": {"url": "https://other.example.com/2.mp4"}
        });

        let found = first_match(&response, VIDEO_URL_ACCESSORS, |v| {
            v.as_str()
                .filter(|s| s.contains("http") || s.contains(".mp4"))
                .map(str::to_string)
        });
        assert_eq!(
            found,
            Some(("data.outputUrl", "https://cdn.example.com/v/1.mp4".to_string()))
        );
    }

    #[test]
    fn test_video_url_accepts_bare_mp4_path() {
        let response = json!({"result": {"videoUrl": "renders/abc.mp4"}});
        assert_eq!(extract_video_url(&response), Some("renders/abc.mp4".into()));
    }

    #[test]
    fn test_video_url_missing() {
        assert_eq!(extract_video_url(&json!({"status": "completed"})), None);
        assert_eq!(extract_video_url(&json!({"url": 12})), None);
    }

    #[test]
    fn test_video_url_vocabulary_size() {
        assert_eq!(VIDEO_URL_ACCESSORS.len(), 19);
    }

    #[test]
    fn test_status_paths() {
        assert_eq!(extract_status(&json!({"status": "DONE"})), Some("DONE".into()));
        assert_eq!(
            extract_status(&json!({"data": {"state": "rendering"}})),
            Some("rendering".into())
        );
        assert_eq!(extract_status(&json!({})), None);
    }

    #[test]
    fn test_generated_text_paths() {
        let chat = json!({"choices": [{"message": {"content": " Script body "}}]});
        assert_eq!(extract_generated_text(&chat), Some("Script body".into()));

        let plain = json!({"output_text": "Other"});
        assert_eq!(extract_generated_text(&plain), Some("Other".into()));

        let empty = json!({"choices": []});
        assert_eq!(extract_generated_text(&empty), None);
    }
}
