/// Embedded page for the dashboard server. It only draws what the server
/// computed and forwards pointer input back as `UiEvent` messages.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>RingLens</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f8fafc;
            color: #0f172a;
        }
        header {
            display: flex;
            align-items: center;
            gap: 24px;
            padding: 12px 24px;
            background: #fff;
            border-bottom: 1px solid #e2e8f0;
        }
        header h1 { font-size: 1.1em; letter-spacing: 0.5px; }
        nav button, .tabs button, .controls button {
            border: 1px solid #e2e8f0;
            background: #fff;
            padding: 6px 12px;
            border-radius: 6px;
            cursor: pointer;
        }
        nav button.active, .tabs button.active { background: #0f172a; color: #fff; }
        #health { margin-left: auto; font-size: 0.85em; }
        #health .dot { display: inline-block; width: 8px; height: 8px; border-radius: 50%; margin-right: 6px; }
        main { padding: 24px; }
        section.page { display: none; }
        section.page.active { display: block; }
        .row { display: flex; gap: 24px; align-items: flex-start; }
        .panel { background: #fff; border: 1px solid #e2e8f0; border-radius: 8px; padding: 16px; }
        .panel h2 { font-size: 0.8em; text-transform: uppercase; color: #64748b; margin-bottom: 12px; }
        .controls { display: flex; gap: 8px; align-items: center; margin-bottom: 12px; flex-wrap: wrap; }
        #pack { position: relative; }
        #tooltip {
            position: absolute;
            display: none;
            pointer-events: none;
            background: #0f172a;
            color: #fff;
            font-size: 0.8em;
            padding: 8px 10px;
            border-radius: 6px;
        }
        .bars { display: flex; align-items: flex-end; height: 120px; gap: 4px; }
        .bars div { flex: 1; border-radius: 3px 3px 0 0; }
        .tone-muted { background: #cbd5e1; }
        .tone-info { background: #3b82f6; }
        .tone-warning { background: #f59e0b; }
        .tone-danger { background: #ef4444; }
        table { width: 100%; border-collapse: collapse; font-size: 0.85em; }
        th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #f1f5f9; }
        .band-critical { color: #ef4444; font-weight: bold; }
        .band-elevated { color: #ea580c; font-weight: bold; }
        .band-normal { color: #ca8a04; font-weight: bold; }
        #suspect-list li { list-style: none; padding: 8px; border-radius: 6px; cursor: pointer; }
        #suspect-list li.selected { background: #eff6ff; }
        .muted { color: #94a3b8; font-size: 0.85em; }
        code { font-family: monospace; }
    </style>
</head>
<body>
    <header>
        <h1>RingLens</h1>
        <nav>
            <button data-page="ingestion">Ingestion</button>
            <button data-page="dashboard">Dashboard</button>
            <button data-page="investigation">Investigation</button>
        </nav>
        <div id="health"><span class="dot"></span><span id="health-text">Checking...</span></div>
    </header>

    <main>
        <section class="page" id="page-ingestion">
            <div class="panel">
                <h2>Ingestion</h2>
                <p>Upload a transaction CSV with <code>ringlens analyze &lt;file&gt;</code>, then open the results.</p>
                <p style="margin-top: 12px"><button id="open-results">Open analysis results</button></p>
            </div>
        </section>

        <section class="page" id="page-dashboard">
            <div class="controls">
                <div class="tabs" id="tabs"></div>
                <button id="zoom-in">+</button>
                <button id="zoom-out">-</button>
                <label>Fan-out
                    <select id="fan-window"></select>
                </label>
                <label><input type="checkbox" id="commission"> Commission retention</label>
                <span class="muted" id="scope"></span>
            </div>
            <div class="row">
                <div class="panel" id="pack"><div id="pack-svg"></div><div id="tooltip"></div></div>
                <div style="flex: 1; display: flex; flex-direction: column; gap: 16px">
                    <div class="panel"><h2>Risk Distribution</h2><div class="bars" id="histogram"></div><p class="muted" id="histogram-caption"></p></div>
                    <div class="panel"><h2>Active Pattern</h2><div id="pattern"></div></div>
                    <div class="panel"><h2>Detected Rings</h2><div id="rings"></div></div>
                </div>
            </div>
        </section>

        <section class="page" id="page-investigation">
            <div class="row">
                <div class="panel" style="width: 320px">
                    <h2>Suspects</h2>
                    <div class="controls">
                        <input id="search" placeholder="Search account">
                        <label><input type="checkbox" id="tag-circular" checked> Circular</label>
                        <label><input type="checkbox" id="tag-smurfing" checked> Smurfing</label>
                    </div>
                    <ul id="suspect-list"></ul>
                </div>
                <div class="panel" id="network"></div>
                <div class="panel" style="width: 240px"><h2>Node Details</h2><div id="details"></div></div>
            </div>
        </section>
    </main>

    <script>
        let state = null;
        let generation = 0;

        async function send(event) {
            const response = await fetch('/api/event', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(event)
            });
            state = await response.json();
            await refresh();
        }

        async function refresh() {
            if (!state) {
                state = await (await fetch('/api/state')).json();
            }
            document.querySelectorAll('nav button').forEach(b =>
                b.classList.toggle('active', b.dataset.page === state.page));
            document.querySelectorAll('section.page').forEach(s =>
                s.classList.toggle('active', s.id === 'page-' + state.page));
            if (state.page === 'dashboard') await loadDashboard();
            if (state.page === 'investigation') await loadInvestigation();
        }

        function escapeHtml(text) {
            const div = document.createElement('div');
            div.textContent = text;
            return div.innerHTML;
        }

        function viewMessage(view, empty) {
            if (view.state === 'loading') return '<p class="muted">Loading...</p>';
            if (view.state === 'failed') return '<p class="band-critical">' + escapeHtml(view.data) + '</p>';
            if (view.state === 'empty') return '<p class="muted">' + empty + '</p>';
            return null;
        }

        async function loadDashboard() {
            const data = await (await fetch('/api/dashboard')).json();
            document.getElementById('tabs').innerHTML = data.tabs.map(t =>
                `<button class="${t.active ? 'active' : ''}" data-cluster="${t.value}">${t.label}</button>`).join('');
            document.getElementById('scope').textContent = 'Network Scope: ' + data.scope + ' nodes';

            const select = document.getElementById('fan-window');
            if (!select.options.length) {
                select.innerHTML = data.fanWindowLabels.map((l, i) => `<option value="${i}">${l}</option>`).join('');
            }
            select.value = state.filters.fanWindow;
            document.getElementById('commission').checked = state.filters.commissionRetention;

            const message = viewMessage(data.analysis, 'No analysis yet.');
            document.getElementById('pack-svg').innerHTML = message || data.svg || '';

            const tooltip = document.getElementById('tooltip');
            if (data.tooltip) {
                tooltip.style.display = 'block';
                tooltip.innerHTML = `<strong>${escapeHtml(data.tooltip.id)}</strong><br>${data.tooltip.categoryLabel}` +
                    `<br>Volume: ${data.tooltip.volume}<br>Transactions: ${data.tooltip.transactions}` +
                    (data.tooltip.isRisk ? '<br><span class="band-critical">High risk</span>' : '');
            } else {
                tooltip.style.display = 'none';
            }

            const w = data.widgets;
            if (!w) {
                ['histogram', 'pattern', 'rings'].forEach(id => document.getElementById(id).innerHTML = '');
                document.getElementById('histogram-caption').textContent = '';
                return;
            }
            document.getElementById('histogram').innerHTML = w.histogram.bars.map(b =>
                `<div class="tone-${b.tone}" style="height:${b.heightPct}%" title="${b.count}"></div>`).join('');
            document.getElementById('histogram-caption').textContent = w.histogram.entityCount + ' entities';

            const p = w.pattern;
            document.getElementById('pattern').innerHTML = p.entityCount === 0
                ? '<p class="muted">No entities selected.</p>'
                : `<p><strong>${p.patternName}</strong> (${p.entityCount} entities)</p>` +
                  `<p class="muted">Max fan-out ${p.maxFanOut}</p><div class="tone-danger" style="height:4px;width:${p.fanOutBarPct}%"></div>` +
                  `<p class="muted">Avg transaction $${Math.round(p.averageTransaction).toLocaleString()}</p><div class="tone-info" style="height:4px;width:${p.averageBarPct}%"></div>` +
                  '<ul>' + p.keyEntities.map(k => `<li><code>${escapeHtml(k.shortId)}</code> ${k.badge}</li>`).join('') + '</ul>';

            document.getElementById('rings').innerHTML = w.rings.length === 0
                ? '<p class="muted">No data for selected cluster.</p>'
                : '<table><tr><th>Ring</th><th>Pattern</th><th>Volume</th><th>Nodes</th><th>Risk</th></tr>' +
                  w.rings.map(r => `<tr><td>${escapeHtml(r.id)}</td><td>${escapeHtml(r.pattern)}</td><td>${r.volume}</td>` +
                      `<td>${r.nodes}</td><td class="band-${r.band}">${r.risk}</td></tr>`).join('') + '</table>';
        }

        async function loadInvestigation() {
            const data = await (await fetch('/api/investigation')).json();
            generation = data.generation;
            const list = document.getElementById('suspect-list');
            const message = viewMessage(data.suspects, 'No suspicious activity detected yet.');
            list.innerHTML = message || data.suspects.data.map(s =>
                `<li class="${s.selected ? 'selected' : ''}" data-id="${escapeHtml(s.id)}">` +
                `<code>${escapeHtml(s.id)}</code> <span class="band-${s.band}">${s.score}</span>` +
                `<br><span class="muted">${escapeHtml(s.cluster)} · ${s.nodes} nodes</span>` +
                (s.patterns.length ? `<br><span class="muted">${s.patterns.join(', ')}</span>` : '') +
                '</li>').join('');
            document.getElementById('network').innerHTML = data.network === 'loading'
                ? '<p class="muted">Loading graph...</p>' : data.svg;
            document.getElementById('details').innerHTML = data.focus
                ? `<p>Focus: <code>${escapeHtml(data.focus)}</code></p>`
                : '<p>Focus: None</p><p class="muted">Select a suspect to inspect its network.</p>';
        }

        function svgPoint(svg, evt) {
            const rect = svg.getBoundingClientRect();
            return { x: evt.clientX - rect.left, y: evt.clientY - rect.top };
        }

        function applyFrame(frame) {
            if (frame.generation !== generation) return;
            const svg = document.querySelector('#network svg');
            if (!svg) return;
            const pos = {};
            frame.nodes.forEach(n => { pos[n.id] = n; });
            svg.querySelectorAll('g.node').forEach(g => {
                const p = pos[g.dataset.id];
                if (p) g.setAttribute('transform', `translate(${p.x},${p.y})`);
            });
            svg.querySelectorAll('line').forEach(line => {
                const s = pos[line.dataset.source], t = pos[line.dataset.target];
                if (!s || !t) return;
                line.setAttribute('x1', s.x); line.setAttribute('y1', s.y);
                line.setAttribute('x2', t.x); line.setAttribute('y2', t.y);
            });
        }

        document.querySelectorAll('nav button').forEach(b =>
            b.addEventListener('click', () => send({ type: 'navigate', page: b.dataset.page })));
        document.getElementById('open-results').addEventListener('click', () => send({ type: 'analysis_complete' }));
        document.getElementById('tabs').addEventListener('click', e => {
            const cluster = e.target.dataset.cluster;
            if (cluster) send({ type: 'select_cluster', cluster });
        });
        document.getElementById('zoom-in').addEventListener('click', () => send({ type: 'zoom_in' }));
        document.getElementById('zoom-out').addEventListener('click', () => send({ type: 'zoom_out' }));
        document.getElementById('fan-window').addEventListener('change', e =>
            send({ type: 'set_fan_window', window: Number(e.target.value) }));
        document.getElementById('commission').addEventListener('change', e =>
            send({ type: 'set_commission_retention', enabled: e.target.checked }));

        const pack = document.getElementById('pack-svg');
        let panning = null, hoverPending = false;
        pack.addEventListener('click', e => {
            const svg = pack.querySelector('svg');
            if (svg) send({ type: 'pack_click', ...svgPoint(svg, e) });
        });
        pack.addEventListener('mousemove', e => {
            const svg = pack.querySelector('svg');
            if (!svg) return;
            if (panning) {
                send({ type: 'pan', dx: e.clientX - panning.x, dy: e.clientY - panning.y });
                panning = { x: e.clientX, y: e.clientY };
                return;
            }
            if (hoverPending) return;
            hoverPending = true;
            send({ type: 'pack_hover', ...svgPoint(svg, e) }).finally(() => { hoverPending = false; });
        });
        pack.addEventListener('mouseleave', () => { panning = null; send({ type: 'pack_leave' }); });
        pack.addEventListener('mousedown', e => { if (e.shiftKey) panning = { x: e.clientX, y: e.clientY }; });
        window.addEventListener('mouseup', () => { panning = null; });
        pack.addEventListener('wheel', e => {
            const svg = pack.querySelector('svg');
            if (!svg) return;
            e.preventDefault();
            const factor = Math.pow(2, -e.deltaY * 0.002);
            send({ type: 'wheel', factor, ...svgPoint(svg, e) });
        }, { passive: false });

        document.getElementById('search').addEventListener('input', e =>
            send({ type: 'search_suspects', term: e.target.value }));
        document.getElementById('tag-circular').addEventListener('change', e =>
            send({ type: 'toggle_pattern', tag: 'Circular', enabled: e.target.checked }));
        document.getElementById('tag-smurfing').addEventListener('change', e =>
            send({ type: 'toggle_pattern', tag: 'Smurfing', enabled: e.target.checked }));
        document.getElementById('suspect-list').addEventListener('click', e => {
            const li = e.target.closest('li[data-id]');
            if (li) send({ type: 'select_suspect', id: li.dataset.id });
        });

        const network = document.getElementById('network');
        let dragging = null;
        function dragEvent(phase, e) {
            const svg = network.querySelector('svg');
            return { type: 'drag', phase, node: dragging, ...svgPoint(svg, e) };
        }
        network.addEventListener('mousedown', e => {
            const g = e.target.closest('g.node');
            if (!g) return;
            dragging = g.dataset.id;
            fetch('/api/event', { method: 'POST', headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(dragEvent('start', e)) });
        });
        window.addEventListener('mousemove', e => {
            if (!dragging) return;
            fetch('/api/event', { method: 'POST', headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(dragEvent('move', e)) });
        });
        window.addEventListener('mouseup', e => {
            if (!dragging) return;
            fetch('/api/event', { method: 'POST', headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(dragEvent('end', e)) });
            dragging = null;
        });

        async function pollHealth() {
            const status = await (await fetch('/api/health')).json();
            const colors = { pending: '#94a3b8', online: '#22c55e', warning: '#f59e0b' };
            document.querySelector('#health .dot').style.background = colors[status.readiness];
            const latency = status.latencyMs == null ? '' : ` · ${Math.round(status.latencyMs)} ms`;
            document.getElementById('health-text').textContent = 'System ' + status.readiness + latency;
        }

        const events = new EventSource('/api/events');
        events.addEventListener('tick', e => applyFrame(JSON.parse(e.data)));
        events.addEventListener('refresh', () => { state = null; refresh(); });

        refresh();
        pollHealth();
        setInterval(pollHealth, 5000);
    </script>
</body>
</html>
"#;
