//! Static log corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of representative log lines.
//! Lines with a leading year use 2004; year-less lines resolve against the
//! builders' pinned reference year.

/// Syslogd-style lines: abbreviated month, day, time, host.
pub const CORPUS_SYSLOG: &[&str] = &[
    "Jan  1 12:34:56 host-device1 system[12345]: host 2001:0db8:1234::1 (interface:eth0) disconnected",
    "Feb 29 01:02:03 gateway dhcpd: DHCPACK on 10.0.0.42 to aa:bb:cc:dd:ee:ff via eth1",
    "Mar 15 23:59:59 db-7 postgres[991]: checkpoint complete: wrote 3410 buffers",
    "2004 Nov  9 06:07:08 core-sw01 link: port 12 state changed to down",
    "Dec 31 00:00:01 web backend: GET /healthz 200",
];

/// ISO-dated lines: `YYYY-MM-DD HH:MM:SS host …`.
pub const CORPUS_ISO: &[&str] = &[
    "2024-01-15 10:00:00 web01 request served in 47ms",
    "2024-01-15 10:00:01 db0 replication lag=3s behind primary 192.0.2.7",
    "2024-06-30 23:59:59 ntp1 clock stepped by -0.004s",
];

/// Apache error-log lines, 2.2 and 2.4 shapes.
pub const CORPUS_APACHE: &[&str] = &[
    "[Thu Jun 09 06:07:04 2005] [notice] LDAP: Built with OpenLDAP LDAP SDK",
    "[Thu Jun 09 06:07:04 2005] [error] [client 192.0.2.9] File does not exist: /var/www/favicon.ico",
    "[Mon Jan 15 10:00:00.123456 2024] [core:error] [pid 1234:tid 5678] [client 10.0.0.1:40960] AH00126: Invalid URI in request",
];

/// Lines no default header rule recognizes.
pub const CORPUS_SHAPELESS: &[&str] = &[
    "starting pipeline with 4 workers",
    "!!! PANIC !!!",
    "<14>weird relay prefix without timestamp",
    "",
];

/// Generate `n` synthetic syslog lines for throughput-style tests.
pub fn corpus_generated(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "Jan {:2} {:02}:{:02}:{:02} host-{} daemon[{}]: unit {} reached target (elapsed:{}ms)",
                i % 28 + 1,
                i / 3600 % 24,
                i / 60 % 60,
                i % 60,
                i % 5,
                1000 + i,
                i % 17,
                i % 400,
            )
        })
        .collect()
}
