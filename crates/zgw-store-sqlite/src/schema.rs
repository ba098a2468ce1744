//! SQL schema for the ZGW SQLite store.
//!
//! Executed once at connection startup. The constraints here back up the
//! validation pipelines: they hold even if a write path skips a check.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Catalogi ──────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS catalogussen (
    uuid                       TEXT PRIMARY KEY,
    domein                     TEXT NOT NULL CHECK (length(domein) BETWEEN 1 AND 5),
    rsin                       TEXT NOT NULL,
    contactpersoon_beheer_naam TEXT NOT NULL
);

-- Relation lists (besluittypen, ...) are JSON arrays of UUIDs.
CREATE TABLE IF NOT EXISTS zaaktypen (
    uuid                        TEXT PRIMARY KEY,
    catalogus                   TEXT NOT NULL REFERENCES catalogussen(uuid),
    identificatie               TEXT NOT NULL,
    omschrijving                TEXT NOT NULL,
    vertrouwelijkheidaanduiding TEXT NOT NULL,
    selectielijst_procestype    TEXT,
    begin_geldigheid            TEXT NOT NULL,   -- YYYY-MM-DD
    einde_geldigheid            TEXT,
    besluittypen                TEXT NOT NULL DEFAULT '[]',
    informatieobjecttypen       TEXT NOT NULL DEFAULT '[]',
    deelzaaktypen               TEXT NOT NULL DEFAULT '[]',
    CHECK (einde_geldigheid IS NULL OR einde_geldigheid >= begin_geldigheid)
);

CREATE TABLE IF NOT EXISTS besluittypen (
    uuid                  TEXT PRIMARY KEY,
    catalogus             TEXT NOT NULL REFERENCES catalogussen(uuid),
    omschrijving          TEXT NOT NULL,
    begin_geldigheid      TEXT NOT NULL,
    einde_geldigheid      TEXT,
    informatieobjecttypen TEXT NOT NULL DEFAULT '[]',
    CHECK (einde_geldigheid IS NULL OR einde_geldigheid >= begin_geldigheid)
);

CREATE TABLE IF NOT EXISTS informatieobjecttypen (
    uuid                        TEXT PRIMARY KEY,
    catalogus                   TEXT NOT NULL REFERENCES catalogussen(uuid),
    omschrijving                TEXT NOT NULL,
    vertrouwelijkheidaanduiding TEXT NOT NULL,
    begin_geldigheid            TEXT NOT NULL,
    einde_geldigheid            TEXT,
    CHECK (einde_geldigheid IS NULL OR einde_geldigheid >= begin_geldigheid)
);

CREATE TABLE IF NOT EXISTS statustypen (
    uuid         TEXT PRIMARY KEY,
    zaaktype     TEXT NOT NULL REFERENCES zaaktypen(uuid),
    omschrijving TEXT NOT NULL,
    volgnummer   INTEGER NOT NULL CHECK (volgnummer BETWEEN 1 AND 9999),
    UNIQUE (zaaktype, volgnummer)
);

CREATE TABLE IF NOT EXISTS resultaattypen (
    uuid                       TEXT PRIMARY KEY,
    zaaktype                   TEXT NOT NULL REFERENCES zaaktypen(uuid),
    omschrijving               TEXT NOT NULL,
    selectielijstklasse        TEXT,
    archiefnominatie           TEXT NOT NULL,
    archiefactietermijn        TEXT,            -- ISO 8601 duration
    brondatum_archiefprocedure TEXT NOT NULL    -- JSON
);

CREATE TABLE IF NOT EXISTS eigenschappen (
    uuid     TEXT PRIMARY KEY,
    zaaktype TEXT NOT NULL REFERENCES zaaktypen(uuid),
    naam     TEXT NOT NULL,
    formaat  TEXT NOT NULL,
    UNIQUE (zaaktype, naam)
);

-- ── Zaken ─────────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS zaken (
    uuid                        TEXT PRIMARY KEY,
    identificatie               TEXT NOT NULL,
    bronorganisatie             TEXT NOT NULL,
    zaaktype                    TEXT NOT NULL REFERENCES zaaktypen(uuid),
    startdatum                  TEXT NOT NULL,
    einddatum                   TEXT,
    archiefnominatie            TEXT,
    archiefactiedatum           TEXT,
    archiefactiedatum_handmatig INTEGER NOT NULL DEFAULT 0,
    hoofdzaak                   TEXT REFERENCES zaken(uuid),
    relevante_andere_zaken      TEXT NOT NULL DEFAULT '[]',
    UNIQUE (identificatie, bronorganisatie),
    CHECK (hoofdzaak IS NULL OR hoofdzaak != uuid)
);

-- Statussen are immutable events.
CREATE TABLE IF NOT EXISTS statussen (
    uuid               TEXT PRIMARY KEY,
    zaak               TEXT NOT NULL REFERENCES zaken(uuid),
    statustype         TEXT NOT NULL REFERENCES statustypen(uuid),
    datum_status_gezet TEXT NOT NULL,   -- RFC 3339 UTC
    statustoelichting  TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS resultaten (
    uuid          TEXT PRIMARY KEY,
    zaak          TEXT NOT NULL UNIQUE REFERENCES zaken(uuid),
    resultaattype TEXT NOT NULL REFERENCES resultaattypen(uuid),
    toelichting   TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS zaakeigenschappen (
    uuid       TEXT PRIMARY KEY,
    zaak       TEXT NOT NULL REFERENCES zaken(uuid),
    eigenschap TEXT NOT NULL REFERENCES eigenschappen(uuid),
    naam       TEXT NOT NULL,
    waarde     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS informatieobjecten (
    uuid                 TEXT PRIMARY KEY,
    identificatie        TEXT NOT NULL,
    titel                TEXT NOT NULL DEFAULT '',
    informatieobjecttype TEXT NOT NULL REFERENCES informatieobjecttypen(uuid)
);

-- ── Besluiten ─────────────────────────────────────────────────────────────

-- Each relation is a local UUID column plus a remote URL column; an empty
-- URL means no remote reference.
CREATE TABLE IF NOT EXISTS besluiten (
    uuid                          TEXT PRIMARY KEY,
    identificatie                 TEXT NOT NULL,
    verantwoordelijke_organisatie TEXT NOT NULL,
    besluittype                   TEXT REFERENCES besluittypen(uuid),
    besluittype_url               TEXT NOT NULL DEFAULT '',
    zaak                          TEXT REFERENCES zaken(uuid),
    zaak_url                      TEXT NOT NULL DEFAULT '',
    datum                         TEXT NOT NULL,
    toelichting                   TEXT NOT NULL DEFAULT '',
    bestuursorgaan                TEXT NOT NULL DEFAULT '',
    ingangsdatum                  TEXT NOT NULL,
    vervaldatum                   TEXT,
    vervalreden                   TEXT,
    publicatiedatum               TEXT,
    verzenddatum                  TEXT,
    uiterlijke_reactiedatum       TEXT,
    UNIQUE (identificatie, verantwoordelijke_organisatie),
    CHECK ((besluittype IS NULL) != (besluittype_url = '')),
    CHECK (zaak IS NULL OR zaak_url = '')
);

CREATE TABLE IF NOT EXISTS besluitinformatieobjecten (
    uuid                 TEXT PRIMARY KEY,
    besluit              TEXT NOT NULL REFERENCES besluiten(uuid),
    informatieobject     TEXT REFERENCES informatieobjecten(uuid),
    informatieobject_url TEXT NOT NULL DEFAULT '',
    UNIQUE (besluit, informatieobject),
    CHECK ((informatieobject IS NULL) != (informatieobject_url = ''))
);

CREATE UNIQUE INDEX IF NOT EXISTS besluitinformatieobjecten_url_idx
    ON besluitinformatieobjecten(besluit, informatieobject_url)
    WHERE informatieobject_url != '';

CREATE INDEX IF NOT EXISTS zaaktypen_scope_idx     ON zaaktypen(catalogus, omschrijving);
CREATE INDEX IF NOT EXISTS besluittypen_scope_idx  ON besluittypen(catalogus, omschrijving);
CREATE INDEX IF NOT EXISTS statussen_zaak_idx      ON statussen(zaak);
CREATE INDEX IF NOT EXISTS besluiten_zaak_idx      ON besluiten(zaak);
CREATE INDEX IF NOT EXISTS zaakeigenschappen_idx   ON zaakeigenschappen(zaak);

PRAGMA user_version = 1;
";
