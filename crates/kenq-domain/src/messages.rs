//! User-facing messages
//!
//! The portal is Japanese-only; every string a company user can see is kept
//! here so handlers and the workflow agree on wording.

pub const LOGIN_REQUIRED: &str = "ログインが必要です";
pub const API_URL_NOT_CONFIGURED: &str = "API URLが設定されていません";
pub const CONTACT_SUPPORT: &str = "担当者にご連絡ください";
pub const LOGIN_FAILED: &str = "ユーザー名またはパスワードが正しくありません";

pub const AI_DIAGNOSIS_BACKEND_FAILED: &str = "AI診断処理中にエラーが発生しました";
pub const AI_DIAGNOSIS_FAILED: &str = "AI診断中にエラーが発生しました";
pub const REGISTRATION_FAILED: &str = "プロジェクト登録中にエラーが発生しました";
pub const MATCHING_FAILED: &str = "マッチング結果取得中にエラーが発生しました";
pub const FAVORITE_FAILED: &str = "お気に入り登録中にエラーが発生しました";

pub const PROJECT_ID_REQUIRED: &str = "project_id is required";
pub const MATCHING_ID_REQUIRED: &str = "matching_id is required";
pub const COMPANY_ID_MISSING: &str = "company_id がセッションに含まれていません";
pub const PROJECT_NOT_FOUND: &str = "案件が見つかりませんでした";

pub const ASSIST_REQUIRES_TITLE_AND_CONTENT: &str =
    "案件タイトルと案件内容の両方を入力してから案件入力AIアシストをご利用ください。";
pub const REQUIRED_FIELDS_PREFIX: &str = "必須項目を入力してください：";
pub const REGISTRATION_ERROR: &str = "案件登録中にエラーが発生しました。";
pub const DIAGNOSIS_UNAVAILABLE: &str = "診断結果が取得できませんでした";
pub const DIAGNOSIS_ERROR: &str = "診断中にエラーが発生しました";

pub const FIELD_TITLE: &str = "案件タイトル";
pub const FIELD_BACKGROUND: &str = "案件内容";
pub const FIELD_UNIVERSITY: &str = "大学";
pub const FIELD_RESEARCHER_LEVEL: &str = "研究者階層";

pub const NOT_SPECIFIED: &str = "未指定";
