//! Embedded HTML/CSS/JS frontend for the charla admin dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.
//!
//! The password is kept in `sessionStorage` for the lifetime of the tab and
//! resent with every API call; logout clears it after a confirmation.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>charla Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #667eea;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app {
  max-width: 1100px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 {
  font-size: 22px;
  font-weight: 600;
}

header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.toolbar { display: flex; gap: 8px; align-items: center; }

button, select, input[type=password], input[type=text] {
  background: var(--surface);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 7px 14px;
  font-size: 13px;
  font-family: var(--font);
}
button { cursor: pointer; }
button:hover { border-color: var(--accent); }
button.primary { background: var(--accent); border-color: var(--accent); color: #fff; }
button.danger:hover { border-color: var(--red); color: var(--red); }

/* Login */
.login-card {
  max-width: 360px;
  margin: 80px auto;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 32px;
  text-align: center;
}
.login-card h2 { margin-bottom: 8px; }
.login-card p { color: var(--text-muted); font-size: 13px; margin-bottom: 20px; }
.login-card input { width: 100%; margin-bottom: 12px; }
.login-card button { width: 100%; }

/* Error banner (auto-dismisses) */
.error-banner {
  background: rgba(248, 81, 73, 0.1);
  border: 1px solid var(--red);
  color: var(--red);
  border-radius: 6px;
  padding: 10px 14px;
  margin-bottom: 16px;
  font-size: 13px;
}
.hidden { display: none; }

/* Stat cards */
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 24px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 18px;
}
.stat-card .value { font-size: 26px; font-weight: 700; font-family: var(--mono); }
.stat-card .label { color: var(--text-muted); font-size: 12px; text-transform: uppercase; letter-spacing: 0.5px; }

/* Panels */
.panel {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 18px;
  margin-bottom: 24px;
}
.panel h3 { font-size: 14px; margin-bottom: 14px; color: var(--text-muted); text-transform: uppercase; letter-spacing: 0.5px; }
.panel-row { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
@media (max-width: 800px) { .panel-row { grid-template-columns: 1fr; } }

/* Vertical bar chart (queries per day) */
.chart {
  display: flex;
  align-items: flex-end;
  gap: 6px;
  height: 160px;
}
.chart .bar-group {
  flex: 1;
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: flex-end;
  height: 100%;
  min-width: 0;
}
.chart .bar {
  width: 100%;
  background: var(--accent);
  border-radius: 3px 3px 0 0;
  position: relative;
  min-height: 2px;
}
.chart .bar:hover { opacity: 0.8; }
.chart .bar-label {
  font-size: 10px;
  color: var(--text-muted);
  margin-top: 4px;
  white-space: nowrap;
  overflow: hidden;
  max-width: 100%;
}
.chart-tooltip {
  position: absolute;
  bottom: 100%;
  left: 50%;
  transform: translateX(-50%);
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 4px;
  padding: 3px 8px;
  font-size: 11px;
  white-space: nowrap;
  opacity: 0;
  pointer-events: none;
  transition: opacity 0.1s;
  z-index: 2;
}
.chart .bar:hover .chart-tooltip { opacity: 1; }

/* Horizontal bar list (popular topics) */
.topic-row { display: flex; align-items: center; gap: 10px; margin-bottom: 8px; }
.topic-row .name { width: 110px; font-size: 12px; color: var(--text-muted); text-align: right; }
.topic-row .track { flex: 1; background: var(--bg); border-radius: 3px; height: 16px; }
.topic-row .fill { background: var(--accent); height: 100%; border-radius: 3px; min-width: 2px; }
.topic-row .count { font-family: var(--mono); font-size: 12px; width: 32px; }

/* Log list */
.log-controls { display: flex; gap: 8px; margin-bottom: 14px; }
.log-controls input { flex: 1; }
.log-entry {
  border-bottom: 1px solid var(--border);
  padding: 12px 0;
}
.log-entry:last-child { border-bottom: none; }
.log-entry .meta { font-size: 11px; color: var(--text-muted); font-family: var(--mono); margin-bottom: 4px; }
.log-entry .user { color: var(--green); }
.log-entry .asst { color: var(--text-muted); }
.log-entry .sources { font-size: 11px; color: var(--text-muted); margin-top: 4px; }
.empty { color: var(--text-muted); text-align: center; padding: 24px; }
</style>
</head>
<body>
<div class="app">

  <!-- Login view -->
  <div id="login-view">
    <div class="login-card">
      <h2><span class="logo">charla</span> Admin</h2>
      <p>Enter the dashboard password to view conversation analytics.</p>
      <div id="login-error" class="error-banner hidden"></div>
      <input type="password" id="password-input" placeholder="Password" autofocus>
      <button class="primary" id="login-btn">Sign in</button>
    </div>
  </div>

  <!-- Dashboard view -->
  <div id="dash-view" class="hidden">
    <header>
      <div>
        <h1><span class="logo">charla</span> Dashboard</h1>
        <div class="subtitle">Conversation logs &amp; analytics</div>
      </div>
      <div class="toolbar">
        <select id="days-select">
          <option value="7" selected>Last 7 days</option>
          <option value="14">Last 14 days</option>
          <option value="30">Last 30 days</option>
          <option value="90">Last 90 days</option>
        </select>
        <button id="refresh-btn">Refresh</button>
        <button id="export-btn">Export</button>
        <button class="danger" id="logout-btn">Logout</button>
      </div>
    </header>

    <div id="dash-error" class="error-banner hidden"></div>

    <div class="stats-grid">
      <div class="stat-card"><div class="value" id="stat-messages">–</div><div class="label">Total messages</div></div>
      <div class="stat-card"><div class="value" id="stat-sessions">–</div><div class="label">Unique sessions</div></div>
      <div class="stat-card"><div class="value" id="stat-msg-len">–</div><div class="label">Avg message length</div></div>
      <div class="stat-card"><div class="value" id="stat-resp-len">–</div><div class="label">Avg response length</div></div>
    </div>

    <div class="panel-row">
      <div class="panel">
        <h3>Queries per day</h3>
        <div class="chart" id="day-chart"></div>
      </div>
      <div class="panel">
        <h3>Popular topics</h3>
        <div id="topic-list"></div>
      </div>
    </div>

    <div class="panel">
      <h3>Conversation logs</h3>
      <div class="log-controls">
        <input type="text" id="search-input" placeholder="Search user messages, responses, session ids...">
      </div>
      <div id="log-list"></div>
    </div>
  </div>

</div>

<script>
'use strict';

const $ = id => document.getElementById(id);

// ---------------------------------------------------------------------------
// Credential handling
// ---------------------------------------------------------------------------

// Tab-scoped: survives refresh, cleared when the tab closes or on logout.
const PASS_KEY = 'charla_dashboard_password';
const getPassword = () => sessionStorage.getItem(PASS_KEY) || '';
const setPassword = p => sessionStorage.setItem(PASS_KEY, p);
const clearPassword = () => sessionStorage.removeItem(PASS_KEY);

function showLogin() {
  $('dash-view').classList.add('hidden');
  $('login-view').classList.remove('hidden');
  $('password-input').value = '';
  $('password-input').focus();
}

function showDashboard() {
  $('login-view').classList.add('hidden');
  $('dash-view').classList.remove('hidden');
}

// ---------------------------------------------------------------------------
// Errors (auto-dismiss after 5s)
// ---------------------------------------------------------------------------

const dismissTimers = {};
function showError(id, message) {
  const el = $(id);
  el.textContent = message;
  el.classList.remove('hidden');
  clearTimeout(dismissTimers[id]);
  dismissTimers[id] = setTimeout(() => el.classList.add('hidden'), 5000);
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

async function api(path, extra) {
  const body = Object.assign({ password: getPassword() }, extra || {});
  const resp = await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  if (!resp.ok) throw new Error('Server error (' + resp.status + ')');
  const data = await resp.json();
  if (data.authenticated === false) {
    clearPassword();
    showLogin();
    throw new Error(data.error || 'Session expired — please sign in again');
  }
  return data;
}

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

async function login() {
  const password = $('password-input').value;
  if (!password) return;
  try {
    const resp = await fetch('/api/login', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ password }),
    });
    const data = await resp.json();
    if (data.authenticated) {
      setPassword(password);
      showDashboard();
      refresh();
    } else {
      showError('login-error', data.error || 'Invalid password');
    }
  } catch (e) {
    showError('login-error', 'Could not reach the server: ' + e.message);
  }
}

function logout() {
  if (!confirm('Log out of the dashboard?')) return;
  clearPassword();
  showLogin();
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

const esc = s => String(s)
  .replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
  .replace(/"/g, '&quot;');

const fmt = n => Number(n).toLocaleString();

function renderAnalytics(a) {
  $('stat-messages').textContent = fmt(a.total_messages);
  $('stat-sessions').textContent = fmt(a.unique_sessions);
  $('stat-msg-len').textContent = a.avg_message_length.toFixed(1);
  $('stat-resp-len').textContent = a.avg_response_length.toFixed(1);

  // Queries per day — vertical bars
  const chart = $('day-chart');
  const days = Object.entries(a.queries_per_day);
  if (days.length === 0) {
    chart.innerHTML = '<div class="empty">No data for this window</div>';
  } else {
    const max = Math.max(...days.map(([, c]) => c), 1);
    chart.innerHTML = days.map(([date, count]) => {
      const h = Math.max(Math.round(count / max * 100), 2);
      const label = date.slice(5); // MM-DD
      return `
        <div class="bar-group">
          <div class="bar" style="height:${h}%">
            <div class="chart-tooltip">${esc(date)}: ${fmt(count)} queries</div>
          </div>
          <div class="bar-label">${esc(label)}</div>
        </div>`;
    }).join('');
  }

  // Popular topics — horizontal bars
  const list = $('topic-list');
  if (a.popular_topics.length === 0) {
    list.innerHTML = '<div class="empty">No topics detected</div>';
  } else {
    const max = Math.max(...a.popular_topics.map(([, c]) => c), 1);
    list.innerHTML = a.popular_topics.map(([topic, count]) => `
      <div class="topic-row">
        <div class="name">${esc(topic)}</div>
        <div class="track"><div class="fill" style="width:${Math.round(count / max * 100)}%"></div></div>
        <div class="count">${fmt(count)}</div>
      </div>`).join('');
  }
}

function renderLogs(logs) {
  const list = $('log-list');
  if (logs.length === 0) {
    list.innerHTML = '<div class="empty">No matching logs</div>';
    return;
  }
  list.innerHTML = logs.map(log => `
    <div class="log-entry">
      <div class="meta">${esc(log.session_id)} · ${esc(log.timestamp)}</div>
      <div class="user">&raquo; ${esc(log.user_message)}</div>
      <div class="asst">${esc(log.assistant_response)}</div>
      ${log.sources && log.sources.length
        ? `<div class="sources">Sources: ${log.sources.map(esc).join(', ')}</div>` : ''}
    </div>`).join('');
}

// ---------------------------------------------------------------------------
// Data loading
// ---------------------------------------------------------------------------

function currentDays() { return parseInt($('days-select').value, 10); }

async function refresh() {
  const days = currentDays();
  const search = $('search-input').value;
  try {
    const [analytics, logs] = await Promise.all([
      api('/api/analytics', { days }),
      api('/api/logs', { days, search }),
    ]);
    renderAnalytics(analytics.analytics);
    renderLogs(logs.logs);
  } catch (e) {
    showError('dash-error', e.message);
  }
}

async function exportLogs() {
  try {
    const data = await api('/api/export', { days: currentDays() });
    const blob = new Blob([JSON.stringify(data.logs, null, 2)], { type: 'application/json' });
    const url = URL.createObjectURL(blob);
    const a = document.createElement('a');
    a.href = url;
    a.download = 'charla_logs_' + new Date().toISOString().slice(0, 10) + '.json';
    a.click();
    URL.revokeObjectURL(url);
  } catch (e) {
    showError('dash-error', e.message);
  }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

let searchTimer;
$('login-btn').addEventListener('click', login);
$('password-input').addEventListener('keydown', e => { if (e.key === 'Enter') login(); });
$('logout-btn').addEventListener('click', logout);
$('refresh-btn').addEventListener('click', refresh);
$('export-btn').addEventListener('click', exportLogs);
$('days-select').addEventListener('change', refresh);
$('search-input').addEventListener('input', () => {
  clearTimeout(searchTimer);
  searchTimer = setTimeout(refresh, 300);
});

// Restore the tab session if the password is still present.
if (getPassword()) {
  showDashboard();
  refresh();
} else {
  showLogin();
}
</script>
</body>
</html>
"##;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
