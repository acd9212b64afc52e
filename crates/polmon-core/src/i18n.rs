//! # Localization
//!
//! The dashboard ships in two variants. Labels are written in Chinese in
//! the code and [`Translator::t`] maps them to English when the English
//! variant is selected. The source column names follow the same rule, so
//! the English data file is expected to carry translated headers.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::I18nError;

/// Built-in English label table.
const EN_TABLE: &str = include_str!("../translations/en.json");

/// Label keys. The key is also the Chinese text.
pub mod label {
    pub const APP_TITLE: &str = "政策监测";
    pub const REGION: &str = "经济体";
    pub const TITLE: &str = "政策动态";
    pub const CATEGORY: &str = "政策类型";
    pub const ISSUER: &str = "发布主体";
    pub const PERIOD: &str = "时间";
    pub const YEAR: &str = "年份";
    pub const KEYWORDS: &str = "关键词";
    pub const DETAIL_URL: &str = "原文链接";
    pub const DESCRIPTION: &str = "政策内容";
    pub const SERIAL: &str = "序号";
    pub const NEWS_LINK: &str = "新闻链接";
    pub const REMARKS: &str = "备注";
    pub const ALL: &str = "全部";
    pub const KEYWORD_PLACEHOLDER: &str = "请输入关键词";
    pub const APPLY: &str = "筛选";
    pub const DOWNLOAD: &str = "下载结果";
    pub const FIRST: &str = "首页";
    pub const PREV: &str = "上一页";
    pub const NEXT: &str = "下一页";
    pub const LAST: &str = "末页";
    pub const PAGE: &str = "页";
    pub const JUMP: &str = "跳转";
    pub const RESULT_PREFIX: &str = "当前筛选结果：";
    pub const RESULT_SUFFIX: &str = "条记录";
    pub const INSTITUTION: &str = "机构名称";
    pub const INSTITUTION_PLACEHOLDER: &str = "请输入机构名称";
    pub const EMAIL: &str = "邮箱";
    pub const EMAIL_PLACEHOLDER: &str = "请输入邮箱";
    pub const SEND_CSV: &str = "发送 CSV";
    pub const SEND_EXCEL: &str = "发送 Excel";
    pub const BACK: &str = "返回列表";
    pub const DETAIL_LINK: &str = "详情链接";
    pub const NO_DESCRIPTION: &str = "暂无详细描述内容。";
    pub const NOT_FOUND: &str = "未找到政策详情。";
    pub const RENDER_ERROR: &str = "表格渲染出错";
    pub const SENT: &str = "文件已发送至邮箱：";
    pub const SEND_FAILED: &str = "发送失败：";
    pub const RELAY_MISSING: &str = "邮件服务未配置";
    pub const INVALID_EMAIL: &str = "邮箱格式不正确";
    pub const INSTITUTION_TOO_SHORT: &str = "机构名称至少需要2个字符";
    pub const SEND_IN_PROGRESS: &str = "文件正在发送，请稍候";
    pub const EXPORT_FAILED: &str = "文件生成失败";
}

/// Which localized variant the process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Cn,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cn => "CN",
            Self::En => "EN",
        }
    }

    /// Path of the source file inside the data repository.
    pub fn default_data_path(&self) -> &'static str {
        match self {
            Self::Cn => "data/data.csv",
            Self::En => "data/data_en.csv",
        }
    }

    /// Value of the HTML `lang` attribute.
    pub fn html_lang(&self) -> &'static str {
        match self {
            Self::Cn => "zh-CN",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CN" => Ok(Self::Cn),
            "EN" => Ok(Self::En),
            other => Err(I18nError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Label lookup for the selected [`Language`].
#[derive(Debug, Clone, Default)]
pub struct Translator {
    language: Language,
    table: HashMap<String, String>,
}

impl Translator {
    /// Translator with the built-in table for `language`.
    pub fn new(language: Language) -> Result<Self, I18nError> {
        let table = match language {
            Language::Cn => HashMap::new(),
            Language::En => serde_json::from_str(EN_TABLE)?,
        };
        Ok(Self { language, table })
    }

    /// Translator whose English table is read from `path`, merged over the
    /// built-in one. Has no effect for [`Language::Cn`].
    pub fn with_overrides(language: Language, path: &Path) -> Result<Self, I18nError> {
        let mut translator = Self::new(language)?;
        if language == Language::En {
            let text = std::fs::read_to_string(path)?;
            let overrides: HashMap<String, String> = serde_json::from_str(&text)?;
            translator.table.extend(overrides);
        }
        Ok(translator)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Translate `key`, falling back to the key itself.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Header names of the source file for one language variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub region: String,
    pub title: String,
    pub category: String,
    pub issuer: String,
    pub period: String,
    pub keywords: String,
    pub detail_url: String,
    pub description: String,
    /// Columns dropped after loading.
    pub dropped: Vec<String>,
}

impl ColumnNames {
    /// Column names as they appear in the file for the translator's language.
    pub fn localized(translator: &Translator) -> Self {
        let t = |key: &str| translator.t(key).to_string();
        Self {
            region: t(label::REGION),
            title: t(label::TITLE),
            category: t(label::CATEGORY),
            issuer: t(label::ISSUER),
            period: t(label::PERIOD),
            keywords: t(label::KEYWORDS),
            detail_url: t(label::DETAIL_URL),
            description: t(label::DESCRIPTION),
            dropped: vec![t(label::SERIAL), t(label::NEWS_LINK), t(label::REMARKS)],
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self::localized(&Translator::default())
    }
}
