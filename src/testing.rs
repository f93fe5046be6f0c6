//! Shared directory fixture for unit tests.

use serde_json::{json, Value};

use crate::models::{DirectorySnapshot, RawDirective};

pub(crate) fn course_feed() -> Value {
    json!({
        "data": [
            {
                "courses": [
                    {"name": "语文", "uid": 11, "courseDcode": "YW"},
                    {"name": "数学", "uid": 12, "courseDcode": "SX"},
                    {"name": "英语", "uid": 13, "courseDcode": "YY"},
                    {"name": "体育", "uid": 15, "courseDcode": "TY"},
                    {"name": "生物", "uid": 16, "courseDcode": "SW"},
                    {"name": "地理", "uid": 17, "courseDcode": "DL"},
                    {"name": "综合实践1", "uid": 18, "courseDcode": "ZH1"}
                ],
                "classes": [
                    {"gradeName": "初一", "name": "01班", "uid": 101, "type": 1},
                    {"gradeName": "初一", "name": "03班", "uid": 103, "type": 1},
                    {"gradeName": "初一", "name": "06班", "uid": 106, "type": 1},
                    {"gradeName": "初一", "name": "07班", "uid": 107, "type": 1}
                ]
            },
            {
                "courses": [
                    {"name": "美术", "uid": 21, "courseDcode": "MS"},
                    {"name": "音乐", "uid": 22, "courseDcode": "YL"},
                    {"name": "体育", "uid": 115, "courseDcode": "TY"},
                    {"name": "数学", "uid": 12, "courseDcode": "SX"}
                ],
                "classes": [
                    {"gradeName": "初二", "name": "01班", "uid": 201, "type": 1},
                    {"gradeName": "初二", "name": "02班", "uid": 202, "type": 1}
                ]
            }
        ]
    })
}

pub(crate) fn teacher_feed() -> Value {
    json!({
        "data": {
            "gradeTeacherClassList": [
                {
                    "teacherClasses": [
                        {
                            "teacher": {"name": "张佳辉", "uid": "t1"},
                            "clazz": {"name": "初一06班", "uid": 106},
                            "course": {"name": "体育", "uid": 15, "courseDcode": "TY"}
                        },
                        {
                            "teacher": {"name": "张佳辉", "uid": "t1"},
                            "clazz": {"name": "初一07班", "uid": 107},
                            "course": {"name": "体育", "uid": 15, "courseDcode": "TY"}
                        },
                        {
                            "teacher": {"name": "钟敏", "uid": "t2"},
                            "clazz": {"name": "初一01班", "uid": 101},
                            "course": {"name": "语文", "uid": 11, "courseDcode": "YW"}
                        },
                        {
                            "teacher": {"name": "钟敏", "uid": "t2"},
                            "clazz": {"name": "初一03班", "uid": 103},
                            "course": {"name": "语文", "uid": 11, "courseDcode": "YW"}
                        },
                        {
                            "teacher": {"name": "张慧 ", "uid": "t3"},
                            "clazz": {"name": "初一01班", "uid": 101},
                            "course": {"name": "数学", "uid": 12, "courseDcode": "SX"}
                        }
                    ],
                    "headerTeachers": [
                        {
                            "teacherId": "t2",
                            "teacherName": "钟敏",
                            "gradeDcode": "G7",
                            "projectSchoolClassId": 101
                        }
                    ]
                },
                {
                    "gradeDecode": "G8",
                    "teacherClasses": [
                        {
                            "teacher": {"name": "李强", "uid": "t4"},
                            "clazz": {"name": "初二01班", "uid": 201},
                            "course": {"name": "数学", "uid": 12, "courseDcode": "SX"}
                        },
                        {
                            "teacher": {"name": "李强", "uid": "t4"},
                            "clazz": {"name": "初二02班", "uid": 202},
                            "course": {"name": "数学", "uid": 12, "courseDcode": "SX"}
                        },
                        {
                            "teacher": {"name": "张慧", "uid": "t3"},
                            "clazz": {"name": "初二01班", "uid": 201},
                            "course": {"name": "音乐", "uid": 22, "courseDcode": "YL"}
                        }
                    ]
                }
            ]
        }
    })
}

/// Directory with two grades, nine courses, six classes and four teachers.
pub(crate) fn directory() -> DirectorySnapshot {
    DirectorySnapshot::from_json(&course_feed().to_string(), &teacher_feed().to_string())
        .expect("fixture feeds parse")
}

/// Parses a directive literal as the NLU collaborator would return it.
pub(crate) fn raw(value: Value) -> RawDirective {
    serde_json::from_value(value).expect("fixture directive parses")
}
