//! Ordered key-path chains for each logical outpass field.

use std::borrow::Cow;

use serde_json::Value;

use crate::models::OutpassRecord;

use self::KeyPath::{Nested, Top};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPath {
    /// A key on the record itself.
    Top(&'static str),
    /// A key inside a nested object, e.g. `studentid.name`.
    Nested(&'static str, &'static str),
}

impl KeyPath {
    fn lookup<'a>(&self, raw: &'a Value) -> Option<&'a Value> {
        match *self {
            KeyPath::Top(key) => raw.get(key),
            KeyPath::Nested(parent, key) => raw.get(parent)?.get(key),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    pub paths: &'static [KeyPath],
    pub default: &'static str,
}

impl FieldChain {
    /// First non-empty value along the chain, or the chain's default.
    pub fn resolve<'a>(&self, raw: &'a Value) -> Cow<'a, str> {
        self.paths
            .iter()
            .find_map(|path| path.lookup(raw).and_then(scalar_text))
            .unwrap_or(Cow::Borrowed(self.default))
    }
}

/// Null, empty strings, zero, `false` and containers count as absent.
fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(Cow::Owned(n.to_string())),
        Value::Bool(true) => Some(Cow::Borrowed("true")),
        _ => None,
    }
}

pub const STUDENT_NAME: FieldChain = FieldChain {
    paths: &[
        Nested("studentid", "name"),
        Nested("student", "name"),
        Top("studentName"),
    ],
    default: "-",
};

pub const REGISTER_NUMBER: FieldChain = FieldChain {
    paths: &[Nested("studentid", "registerNumber")],
    default: "",
};

pub const DEPARTMENT: FieldChain = FieldChain {
    paths: &[Nested("studentid", "department"), Nested("student", "department")],
    default: "-",
};

pub const BATCH: FieldChain = FieldChain {
    paths: &[Nested("studentid", "year"), Nested("student", "year")],
    default: "-",
};

pub const RESIDENCE_TYPE: FieldChain = FieldChain {
    paths: &[
        Nested("studentid", "studentType"),
        Nested("studentid", "residenceType"),
    ],
    default: "Hosteller",
};

pub const OUTPASS_TYPE: FieldChain = FieldChain {
    paths: &[Top("outpassType"), Top("outpasstype"), Top("type")],
    default: "-",
};

pub const STATUS: FieldChain = FieldChain {
    paths: &[Top("outpassStatus"), Top("status")],
    default: "-",
};

pub const FROM_DATE: FieldChain = FieldChain {
    paths: &[Top("fromDate"), Top("outDate")],
    default: "",
};

pub const TO_DATE: FieldChain = FieldChain {
    paths: &[Top("toDate"), Top("inDate")],
    default: "",
};

pub const STAFF_APPROVAL: FieldChain = FieldChain {
    paths: &[Top("staffapprovalstatus"), Top("staffApprovalStatus")],
    default: "Pending",
};

pub const WARDEN_APPROVAL: FieldChain = FieldChain {
    paths: &[Top("wardenapprovalstatus"), Top("wardenApprovalStatus")],
    default: "Pending",
};

pub const YEAR_INCHARGE_APPROVAL: FieldChain = FieldChain {
    paths: &[
        Top("yearinchargeapprovalstatus"),
        Top("yearInchargeApprovalStatus"),
    ],
    default: "Pending",
};

pub const REASON: FieldChain = FieldChain {
    paths: &[Top("reason")],
    default: "-",
};

pub const CREATED_AT: FieldChain = FieldChain {
    paths: &[Top("createdAt")],
    default: "",
};

impl OutpassRecord {
    pub fn field(&self, chain: &FieldChain) -> Cow<'_, str> {
        chain.resolve(self.raw())
    }

    pub fn view(&self) -> NormalizedView<'_> {
        NormalizedView::of(self)
    }
}

/// Read-only projection of a record onto the logical field table.
/// Built on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedView<'a> {
    pub student_name: Cow<'a, str>,
    pub register_number: Cow<'a, str>,
    pub department: Cow<'a, str>,
    pub batch: Cow<'a, str>,
    pub residence_type: Cow<'a, str>,
    pub outpass_type: Cow<'a, str>,
    pub status: Cow<'a, str>,
    pub from_date: Cow<'a, str>,
    pub to_date: Cow<'a, str>,
    pub staff_approval: Cow<'a, str>,
    pub warden_approval: Cow<'a, str>,
    pub year_incharge_approval: Cow<'a, str>,
    pub reason: Cow<'a, str>,
    pub created_at: Cow<'a, str>,
}

impl<'a> NormalizedView<'a> {
    pub fn of(record: &'a OutpassRecord) -> Self {
        let raw = record.raw();
        Self {
            student_name: STUDENT_NAME.resolve(raw),
            register_number: REGISTER_NUMBER.resolve(raw),
            department: DEPARTMENT.resolve(raw),
            batch: BATCH.resolve(raw),
            residence_type: RESIDENCE_TYPE.resolve(raw),
            outpass_type: OUTPASS_TYPE.resolve(raw),
            status: STATUS.resolve(raw),
            from_date: FROM_DATE.resolve(raw),
            to_date: TO_DATE.resolve(raw),
            staff_approval: STAFF_APPROVAL.resolve(raw),
            warden_approval: WARDEN_APPROVAL.resolve(raw),
            year_incharge_approval: YEAR_INCHARGE_APPROVAL.resolve(raw),
            reason: REASON.resolve(raw),
            created_at: CREATED_AT.resolve(raw),
        }
    }
}
