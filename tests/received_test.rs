use received_field::{DateSource, ReceivedField, SplitKind};

const CORPUS: &[&str] = &[
    "",
    "from localhost (localhost [127.0.0.1]) by xxx.xxxxx.com (Postfix) with ESMTP id 50FD3A96F for <xxxx@xxxx.com>; Tue, 10 May 2005 17:26:50 +0000 (GMT)",
    "from localhost (localhost [127.0.0.1]) by xxx.xxxxx.com (Postfix) with ESMTP id 50FD3A96F for <xxxx@xxxx.com>; Tue, 10 May 2005 17:26:50 -0500 (EST)",
    "(qmail 24365 invoked by uid 99); 25 Jan 2011 12:31:11 -0000",
    "mail.example.com (192.168.1.1) by mail.example.com with (esmtp) id (qid)  for <foo@example.com>; Mon, 29 Jul 2013 25:12:46 +0900",
    "by 2002:a05:7000:108d:0:0:0:0 with SMTP id y13csp23744073wrw;\nWed, 13 Mar 2019 14:50:05 -0700 (PDT)",
    "from [192.168.1.186] ([206.248.139.39]) by mx.google.com with ESMTPSA id m10sm4741360qae.12.2013.08.06.07.40.15 for <multiple recipients> (version=TLSv1 cipher=RC4-SHA bits=128/128); Tue, 06 Aug 2013 07:40:18 -0700 (PDT)'",
    "from mx.example.com (mx.example.com [192.0.2.7])\r\n\tby mail.example.org (Postfix) with ESMTPS id 4F3A\r\n\tfor <user@example.org>; Sat, 19 Sep 2020 12:39:35 +0930 (ACST)",
    "from a by b",
    "from a by b for <o'brien@example.com>; 25 JAN 2011 12:31:11 -0000",
];

#[test]
fn encoded_ends_in_a_single_crlf() {
    for raw in CORPUS {
        let encoded = ReceivedField::new(*raw).encoded();
        assert!(encoded.starts_with("Received: "), "{:?}", encoded);
        assert!(encoded.ends_with("\r\n"), "{:?}", encoded);
        assert_eq!(encoded.matches("\r\n").count(), 1, "{:?}", encoded);
        let line = &encoded[..encoded.len() - 2];
        assert!(!line.contains(|ch: char| ch == '\r' || ch == '\n'), "{:?}", encoded);
    }
}

// Holds for values with at most one trailing comment; see
// `decoded_strips_only_the_last_comment`.
#[test]
fn decoded_is_idempotent() {
    for raw in CORPUS {
        let once = ReceivedField::new(*raw).decoded().to_owned();
        let twice = ReceivedField::new(once.as_str()).decoded().to_owned();
        assert_eq!(once, twice, "{:?}", raw);
    }
}

#[test]
fn decoded_strips_only_the_last_comment() {
    let raw = "from a by b; 25 Jan 2011 12:31:11 -0000 (UTC) (x)";
    let field = ReceivedField::new(raw);
    assert_eq!(field.date_time(), None);
    let once = field.decoded().to_owned();
    assert_eq!(once, "from a by b; 25 Jan 2011 12:31:11 -0000 (UTC)");
    // Decoding again peels the next comment and the date clause now parses.
    let again = ReceivedField::new(once.as_str());
    assert_eq!(again.decoded(), "from a by b; 25 Jan 2011 12:31:11 -0000");
    assert!(again.date_time().is_some());
}

#[test]
fn strict_dates_keep_their_offset() {
    for (raw, offset) in &[
        (CORPUS[1], 0),
        (CORPUS[2], -5 * 3600),
        (CORPUS[3], 0),
        (CORPUS[7], 9 * 3600 + 30 * 60),
        (CORPUS[9], 0),
    ] {
        let date = ReceivedField::new(*raw).received_date().unwrap();
        assert_eq!(date.source, DateSource::Strict);
        assert_eq!(date.value.offset().local_minus_utc(), *offset, "{:?}", raw);
    }
}

#[test]
fn info_is_text_before_the_separator() {
    for raw in &[CORPUS[1], CORPUS[3], CORPUS[4], CORPUS[7], CORPUS[9]] {
        let field = ReceivedField::new(*raw);
        assert_eq!(field.split_kind(), SplitKind::Structured);
        let (before, _) = raw.split_at(raw.rfind(';').unwrap());
        assert_eq!(field.info(), before.trim(), "{:?}", raw);
    }
}

#[test]
fn unstructured_values_lose_info_and_time() {
    for raw in &[CORPUS[5], CORPUS[6]] {
        let field = ReceivedField::new(*raw);
        assert_eq!(field.split_kind(), SplitKind::Unstructured);
        assert_eq!(field.info(), "");
        let formatted = field.formatted_date().unwrap();
        assert!(formatted.ends_with(" 00:00:00 +0000"), "{}", formatted);
    }
}

#[test]
fn folded_value_encodes_on_one_line() {
    let field = ReceivedField::new(CORPUS[7]);
    assert_eq!(
        field.encoded(),
        "Received: from mx.example.com (mx.example.com [192.0.2.7])\tby mail.example.org \
         (Postfix) with ESMTPS id 4F3A\tfor <user@example.org>; Sat, 19 Sep 2020 12:39:35 +0930\r\n"
    );
    assert_eq!(
        field.formatted_date().as_deref(),
        Some("Sat, 19 Sep 2020 12:39:35 +0930")
    );
}

#[test]
fn apostrophe_and_upper_case_month() {
    let field = ReceivedField::new(CORPUS[9]);
    assert_eq!(field.info(), "from a by b for <o'brien@example.com>");
    assert_eq!(
        field.formatted_date().as_deref(),
        Some("Tue, 25 Jan 2011 12:31:11 +0000")
    );
}

#[test]
fn fields_are_shareable_across_threads() {
    let field = std::sync::Arc::new(ReceivedField::new(CORPUS[1]));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let field = field.clone();
            std::thread::spawn(move || field.formatted_date())
        })
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().unwrap().as_deref(),
            Some("Tue, 10 May 2005 17:26:50 +0000")
        );
    }
}
